//! Session toggle parsing under both build modes.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn env_with(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

struct ReleaseEnv {
    key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

impl ReleaseEnv {
    fn set(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    fn unset(mut self, name: &'static str) -> Self {
        self.vars.remove(name);
        self
    }

    fn settings(self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        let env = env_with(self.vars);
        let result = session_settings_from_env(&env, mode);
        drop(self.key);
        result
    }
}

#[fixture]
fn release_env() -> ReleaseEnv {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let path = key.path().to_string_lossy().into_owned();
    let vars = HashMap::from([
        (KEY_FILE_ENV, path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseEnv { key, vars }
}

#[rstest]
fn release_accepts_complete_configuration(release_env: ReleaseEnv) {
    let settings = release_env
        .settings(BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggle(release_env: ReleaseEnv, #[case] name: &'static str) {
    let err = release_env
        .unset(name)
        .settings(BuildMode::Release)
        .err()
        .expect("missing toggle must fail");
    assert!(matches!(err, SessionConfigError::MissingEnv { name: n } if n == name));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sideways")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_malformed_toggle(
    release_env: ReleaseEnv,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let err = release_env
        .set(name, value)
        .settings(BuildMode::Release)
        .err()
        .expect("malformed toggle must fail");
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: n, .. } if n == name));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_env: ReleaseEnv) {
    let err = release_env
        .set(ALLOW_EPHEMERAL_ENV, "yes")
        .settings(BuildMode::Release)
        .err()
        .expect("ephemeral keys are debug only");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_insecure_same_site_none(release_env: ReleaseEnv) {
    let err = release_env
        .set(COOKIE_SECURE_ENV, "0")
        .set(SAMESITE_ENV, "None")
        .settings(BuildMode::Release)
        .err()
        .expect("SameSite=None needs Secure");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_unreadable_key(release_env: ReleaseEnv) {
    let err = release_env
        .set(KEY_FILE_ENV, "/nonexistent/session_key")
        .settings(BuildMode::Release)
        .err()
        .expect("missing key file must fail");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_key(release_env: ReleaseEnv) {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let path = short.path().to_string_lossy().into_owned();
    let err = release_env
        .set(KEY_FILE_ENV, &path)
        .settings(BuildMode::Release)
        .err()
        .expect("short key must fail");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn debug_defaults_apply_without_environment() {
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, "/nonexistent/session_key".to_owned());
    let settings = session_settings_from_env(&env_with(vars), BuildMode::Debug)
        .expect("debug tolerates missing toggles");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_falls_back_on_malformed_same_site(release_env: ReleaseEnv) {
    let settings = release_env
        .set(SAMESITE_ENV, "sideways")
        .settings(BuildMode::Debug)
        .expect("debug falls back");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("TRUE", Some(true))]
#[case("n", Some(false))]
#[case("2", None)]
fn bool_toggle_parsing(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
