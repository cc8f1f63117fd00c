//! Host checks run before a deployer is constructed.

use crate::error::EnvironmentError;

/// Tools every deployment shells out to, with an install hint each.
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("git", "Install it first, e.g. `sudo apt install git`."),
    (
        "docker",
        "See https://docs.docker.com/engine/install/ubuntu/#install-using-the-repository.",
    ),
    (
        "docker-compose",
        "See https://docs.docker.com/engine/install/ubuntu/#install-using-the-repository.",
    ),
];

/// Fail unless this host can run a deployment.
pub fn check_host() -> Result<(), EnvironmentError> {
    check_with(std::env::consts::OS, |tool| which::which(tool).is_ok())
}

/// [`check_host`] with the OS name and tool lookup supplied by the caller.
pub fn check_with(os: &str, has_tool: impl Fn(&str) -> bool) -> Result<(), EnvironmentError> {
    if os == "windows" {
        return Err(EnvironmentError::UnsupportedPlatform { os: os.to_owned() });
    }
    for (tool, hint) in REQUIRED_TOOLS {
        if !has_tool(tool) {
            return Err(EnvironmentError::ToolMissing {
                tool: (*tool).to_owned(),
                hint: (*hint).to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn windows_is_rejected_before_tools_are_checked() {
        let err = check_with("windows", |_| panic!("must not look up tools")).unwrap_err();
        assert_eq!(
            err,
            EnvironmentError::UnsupportedPlatform {
                os: "windows".into()
            }
        );
    }

    #[rstest]
    #[case("git")]
    #[case("docker")]
    #[case("docker-compose")]
    fn each_missing_tool_is_named(#[case] missing: &str) {
        let err = check_with("linux", |tool| tool != missing).unwrap_err();
        match err {
            EnvironmentError::ToolMissing { tool, .. } => assert_eq!(tool, missing),
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[rstest]
    #[case("linux")]
    #[case("macos")]
    fn unix_hosts_with_all_tools_pass(#[case] os: &str) {
        check_with(os, |_| true).expect("preflight");
    }
}
