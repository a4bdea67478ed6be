//! Shared plumbing for the debuggee binaries

use std::ffi::OsString;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` overrides the default `warn`.
///
/// Stdout belongs to the debuggee output that tests assert on, so nothing
/// from tracing goes there.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The process arguments after the program name, verbatim.
///
/// Nothing is interpreted here: `--`, `-h` and unknown flags all reach the
/// debuggee unchanged.
#[must_use]
pub fn debuggee_args() -> Vec<String> {
    collect_args(std::env::args_os().skip(1))
}

/// Convert raw arguments, replacing invalid UTF-8 lossily.
#[must_use]
pub fn collect_args<I>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    argv.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(argv: &[&str]) -> Vec<String> {
        collect_args(argv.iter().map(OsString::from))
    }

    #[test]
    fn empty_argument_list() {
        assert!(collect(&[]).is_empty());
    }

    #[test]
    fn hyphenated_arguments_pass_through() {
        assert_eq!(
            collect(&["-fCalling", "--verbose", "-h", "plain"]),
            vec!["-fCalling", "--verbose", "-h", "plain"]
        );
    }

    #[test]
    fn leading_double_dash_is_kept() {
        assert_eq!(collect(&["--", "-fCalling"]), vec!["--", "-fCalling"]);
    }

    #[cfg(unix)]
    #[test]
    fn invalid_utf8_is_replaced() {
        use std::os::unix::ffi::OsStringExt;

        let args = collect_args([OsString::from_vec(vec![b'a', 0xff, b'b'])]);
        assert_eq!(args, vec!["a\u{fffd}b"]);
    }
}
