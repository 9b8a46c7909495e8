use env_logger::Env;

pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

pub const COMPILE_TIME: &str = match option_env!("DRONE_HELM_COMPILE_TIME") {
    Some(compile_time) => compile_time,
    None => "UNKNOWN",
};

pub const COMMIT: &str = match option_env!("DRONE_HELM_COMMIT") {
    Some(commit) => commit,
    None => "UNKNOWN",
};

pub fn banner() -> String {
    format!(
        "Drone Helm Plugin\nRelease: {}\nCompile Time: {}\nCommit: {}",
        RELEASE, COMPILE_TIME, COMMIT
    )
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

#[test]
fn test_banner_lists_build_metadata() {
    let banner = banner();
    assert!(banner.starts_with("Drone Helm Plugin\n"));
    assert!(banner.contains(format!("Release: {}", RELEASE).as_str()));
    assert!(banner.contains("Compile Time: "));
    assert!(banner.contains("Commit: "));
}
