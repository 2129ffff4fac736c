use std::{
    fs::File,
    io,
    os::unix::process::CommandExt as _,
    path::Path,
    process::{Command, Stdio},
};

use crate::{config::StdoutCapture, nodes::common::config::paths::ensure_parent_dir};

/// `<binary> --test --test-dir <data-dir>`, detached into a fresh process
/// group so the testnet and anything it forks can be signalled together.
pub fn testnet_command(
    binary: &Path,
    data_dir: &Path,
    stdout: &StdoutCapture,
) -> io::Result<Command> {
    let mut command = Command::new(binary);
    command
        .arg("--test")
        .arg("--test-dir")
        .arg(data_dir)
        .stdin(Stdio::null())
        .stdout(stdout_for(stdout)?)
        .stderr(Stdio::inherit())
        .process_group(0);
    Ok(command)
}

fn stdout_for(capture: &StdoutCapture) -> io::Result<Stdio> {
    match capture {
        StdoutCapture::Piped => Ok(Stdio::piped()),
        StdoutCapture::File(path) => {
            ensure_parent_dir(path)?;
            File::create(path).map(Stdio::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn passes_test_mode_and_data_dir() {
        let command = testnet_command(
            Path::new("./target/debug/aptos-node"),
            Path::new("./test_indexer_grpc_testnet"),
            &StdoutCapture::Piped,
        )
        .expect("command");

        assert_eq!(command.get_program(), OsStr::new("./target/debug/aptos-node"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            [
                OsStr::new("--test"),
                OsStr::new("--test-dir"),
                OsStr::new("./test_indexer_grpc_testnet"),
            ]
        );
    }

    #[test]
    fn file_capture_creates_log_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("logs").join("testnet.stdout");

        testnet_command(
            Path::new("aptos-node"),
            dir.path(),
            &StdoutCapture::File(log.clone()),
        )
        .expect("command");

        assert!(log.is_file());
    }
}
