//! Builtin commands handled in-process by the dispatcher.
//!
//! Builtins declare their argument surface with [`argh`] (`FromArgs`) and
//! are executed without spawning a child process. Only `cd` carries its own
//! behavior here; `history` needs the dispatcher's state (the buffer and
//! the ability to re-run a line), so this module defines its argument shape
//! and the interpreter drives it.

use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::path::PathBuf;

/// Parses builtin arguments the way `argh` expects them, with the command
/// name supplied separately from its argument tokens.
///
/// On `Err`, the `EarlyExit` output is either help text (for `--help`) or a
/// usage error; the caller prints it and moves on.
pub(crate) fn parse_args<T: FromArgs>(name: &str, tokens: &[String]) -> Result<T, EarlyExit> {
    let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
    T::from_args(&[name], &args)
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, absolute or relative to the current directory
    pub target: Option<String>,
}

impl Cd {
    pub const NAME: &'static str = "cd";

    pub fn execute(self) -> Result<()> {
        let Some(target) = self.target.filter(|t| !t.is_empty()) else {
            bail!("must pass directory to change");
        };

        let target = PathBuf::from(target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env::current_dir()
                .context("cd: can't read current directory")?
                .join(target)
        };

        env::set_current_dir(&new_dir)
            .with_context(|| format!("cd: can't chdir to {}", new_dir.display()))?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Print, replay, or clear the command history.
pub struct Hist {
    #[argh(switch, short = 'c')]
    /// forget every recorded entry
    pub clear: bool,

    #[argh(positional)]
    /// entry to re-execute, by the index printed by a bare `history`
    pub entry: Option<String>,
}

impl Hist {
    pub const NAME: &'static str = "history";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    // `cd` mutates process-wide state, so these tests serialize on it.
    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn test_cd_without_target_is_an_error() {
        let _lock = lock_current_dir();
        let err = Cd { target: None }.execute().unwrap_err();
        assert_eq!(err.to_string(), "must pass directory to change");
    }

    #[test]
    fn test_cd_relative_parent() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let outer = tempfile::tempdir().unwrap();
        let inner = outer.path().join("inner");
        fs::create_dir(&inner).unwrap();
        env::set_current_dir(&inner).unwrap();

        Cd {
            target: Some("..".to_string()),
        }
        .execute()
        .unwrap();

        let now = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        assert_eq!(now, fs::canonicalize(outer.path()).unwrap());

        env::set_current_dir(orig).unwrap();
    }

    #[test]
    fn test_cd_absolute_path() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let temp = tempfile::tempdir().unwrap();
        Cd {
            target: Some(temp.path().to_string_lossy().into_owned()),
        }
        .execute()
        .unwrap();

        let now = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        assert_eq!(now, fs::canonicalize(temp.path()).unwrap());

        env::set_current_dir(orig).unwrap();
    }

    #[test]
    fn test_cd_nonexistent_path_reports_and_keeps_cwd() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let res = Cd {
            target: Some(format!("no_such_dir_{}", std::process::id())),
        }
        .execute();

        assert!(res.is_err());
        assert_eq!(env::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_hist_argument_shapes() {
        let bare: Hist = parse_args(Hist::NAME, &[]).unwrap();
        assert!(!bare.clear);
        assert!(bare.entry.is_none());

        let clear: Hist = parse_args(Hist::NAME, &["-c".to_string()]).unwrap();
        assert!(clear.clear);

        let recall: Hist = parse_args(Hist::NAME, &["3".to_string()]).unwrap();
        assert_eq!(recall.entry.as_deref(), Some("3"));
    }
}
