//! Application orchestrator.
//! Loads/merges config, initializes logging, owns the temp registry and its
//! interrupt handler, and dispatches the chosen subcommand.

use anyhow::{Context, Result};
use dirsync::output as out;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use dirsync::cli::{Args, Command, depth_from};
use dirsync::{
    Config, DirSyncError, OverwritePolicy, ScanOptions, TempRegistry, config, config_path,
    copy_dir, delete_tree, dir_md5, find_tmp, move_dir, prepare_backup_dir, scan_directory,
    temp_dir,
};
use regex::Regex;

use crate::logging::init_tracing;

/// Exit status used when the run is cut short by Ctrl-C.
const INTERRUPT_EXIT_CODE: i32 = 130;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle print-config before logging init
    if matches!(args.command, Command::PrintConfig) {
        return print_config(&args);
    }

    let mut cfg = config::load()?;
    args.apply_overrides(&mut cfg);

    // Held until the end of run so buffered file logs are flushed.
    let _log_guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    let registry = TempRegistry::shared();
    // Declared after the log guard so temp cleanup is logged before the flush.
    let _drain = registry.guard();
    {
        let registry = Arc::clone(&registry);
        ctrlc::set_handler(move || {
            out::print_warn("Received interrupt; removing temporary files...");
            registry.drain();
            std::process::exit(INTERRUPT_EXIT_CODE);
        })
        .context("failed to install signal handler")?;
    }

    debug!(command = ?args.command, "Starting dirsync");

    dispatch(&cfg, &registry, &args.command).inspect_err(log_failure)
}

fn dispatch(cfg: &Config, registry: &TempRegistry, command: &Command) -> Result<()> {
    match command {
        Command::Copy {
            src,
            dst,
            policy,
            staged,
        } => {
            if *staged {
                staged_copy(cfg, registry, src, dst, *policy)?;
            } else {
                copy_dir(src, dst, *policy)?;
            }
            out::print_success(&format!("Copied '{}' -> '{}'", src.display(), dst.display()));
        }
        Command::Move {
            src,
            dst,
            overwrite,
        } => {
            move_dir(src, dst, *overwrite)?;
            out::print_success(&format!("Moved '{}' -> '{}'", src.display(), dst.display()));
        }
        Command::Delete {
            path,
            force,
            follow_symlinks,
        } => {
            delete_tree(path, *force, *follow_symlinks)
                .with_context(|| format!("delete '{}'", path.display()))?;
            out::print_success(&format!("Deleted '{}'", path.display()));
        }
        Command::Scan {
            dir,
            mask,
            exclude,
            max_depth,
            min_depth,
            key,
            include_dot_files,
        } => {
            let mask = Regex::new(mask).with_context(|| format!("invalid --mask '{mask}'"))?;
            let mut opts = ScanOptions::new(mask)
                .depth(depth_from(*max_depth))
                .min_depth(*min_depth)
                .key((*key).into())
                .include_dot_files(*include_dot_files);
            if !exclude.is_empty() {
                opts = opts.exclude(exclude.iter().cloned());
            }
            let found = scan_directory(dir, &opts);
            info!(dir = %dir.display(), count = found.len(), "Scan finished");
            for entry in found.values() {
                out::print_user(&entry.full_path.display().to_string());
            }
        }
        Command::Digest { dir } => {
            out::print_user(&dir_md5(dir)?);
        }
        Command::BackupDir { root, subdir } => {
            let path = prepare_backup_dir(cfg, root.as_deref(), subdir.as_deref())?;
            out::print_user(&path.display().to_string());
        }
        // Handled in run() before logging init.
        Command::PrintConfig => {}
    }
    Ok(())
}

/// Copy into a registered staging directory, then move the finished copy into place,
/// so `dst` never exists in a half-copied state.
fn staged_copy(
    cfg: &Config,
    registry: &TempRegistry,
    src: &Path,
    dst: &Path,
    policy: OverwritePolicy,
) -> Result<()> {
    let dst_exists = std::fs::symlink_metadata(dst).is_ok();
    if dst_exists && policy == OverwritePolicy::Abort {
        return Err(DirSyncError::DestinationExists(dst.to_path_buf()).into());
    }

    let stage_root = temp_dir(registry, &find_tmp(cfg), "dirsync-stage-")?;
    let stage = stage_root.join("tree");
    copy_dir(src, &stage, OverwritePolicy::Abort)?;
    debug!(stage = %stage.display(), "Staging copy complete");

    if dst_exists && policy == OverwritePolicy::Merge {
        copy_dir(&stage, dst, OverwritePolicy::Merge)?;
    } else {
        move_dir(&stage, dst, true)?;
    }
    Ok(())
}

fn print_config(args: &Args) -> Result<()> {
    match config_path() {
        Some(p) => {
            out::print_info(&format!("dirsync config path:\n  {}\n", p.display()));
            if !p.exists() {
                out::print_info("No config file exists there yet; defaults are in effect.");
            }
        }
        None => out::print_error("Could not determine a config path"),
    }
    let mut cfg = config::load()?;
    args.apply_overrides(&mut cfg);
    for name in ["backup_dir", "tmp_dir", "log_level", "log_file"] {
        out::print_user(&format!("{name} = {}", cfg.option_or(name, "(unset)")));
    }
    Ok(())
}

fn log_failure(e: &anyhow::Error) {
    let Some(err) = e.downcast_ref::<DirSyncError>() else {
        error!(error = %format!("{e:#}"), "Command failed");
        return;
    };
    let code = err.code();
    let kind = err.kind();
    match err {
        DirSyncError::DestinationExists(path)
        | DirSyncError::SourceUnreadable(path)
        | DirSyncError::DestinationNotWritable(path) => {
            error!(code, kind, path = %path.display(), "{err}")
        }
        DirSyncError::CreateDirFailure { path, source } => {
            error!(code, kind, path = %path.display(), error = %source, "{err}")
        }
        DirSyncError::ParentNotWritable { path, parent } => {
            error!(code, kind, path = %path.display(), parent = %parent.display(), "{err}")
        }
        DirSyncError::CopyFailed { src, dst, source } => {
            error!(code, kind, src = %src.display(), dest = %dst.display(), failed_at = %source.path.display(), error = %source.source, "{err}")
        }
        DirSyncError::MoveFailed { src, dst, source } => {
            error!(code, kind, src = %src.display(), dest = %dst.display(), cause = %source, "{err}")
        }
        DirSyncError::BackupPathInsideRoot { backup, root } => {
            error!(code, kind, backup = %backup.display(), root = %root.display(), "{err}")
        }
        DirSyncError::Io { op, path, source } => {
            error!(code, kind, op, path = %path.display(), error = %source, "{err}")
        }
    }
}
