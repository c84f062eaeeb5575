//! User-facing console messages.
//! Status lines get a coloured prefix when the stream is a TTY; primary
//! command output (scan listings, digests, paths) is printed bare on stdout.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn is_tty(self) -> bool {
        match self {
            Stream::Stdout => atty::is(atty::Stream::Stdout),
            Stream::Stderr => atty::is(atty::Stream::Stderr),
        }
    }
}

fn emit(stream: Stream, prefix: &str, colored: String, msg: &str) {
    let line = if stream.is_tty() {
        format!("{colored} {msg}")
    } else {
        format!("{prefix} {msg}")
    };
    match stream {
        Stream::Stdout => println!("{line}"),
        Stream::Stderr => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Stdout, "info:", "info:".cyan().bold().to_string(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Stderr, "warn:", "warn:".yellow().bold().to_string(), msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Stderr, "error:", "error:".red().bold().to_string(), msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Stdout, "ok:", "ok:".green().bold().to_string(), msg);
}

/// Print a plain line (no prefix). Use this for outputs users may script against,
/// such as scan listings, digests and created paths.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
