//! Discovery Resolver - classification of tokens no category knows
//!
//! Steps, in order:
//! 1. website probe: GET `https://<token>.com`, then `https://<token>.com.br`
//! 2. local application: file names in every `$PATH` directory
//! 3. operator: ask for a path or a link
//!
//! The operator step always answers, so discovery never fails. Each probe
//! reports a [`ProbeOutcome`] so callers can tell "definitely absent" from
//! "could not check".

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::error::ComandoError;
use crate::types::{DiscoveryOutcome, DiscoverySource};

/// Suffixes tried by the website probe, in order
pub const WEBSITE_SUFFIXES: &[&str] = &[".com", ".com.br"];

/// Result of a best-effort probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Evidence of a hit (canonical URL, file name)
    Found(String),
    /// The probe ran and found nothing
    NotFound,
    /// The probe could not run (network down, no PATH)
    Unavailable(String),
}

impl ProbeOutcome {
    pub fn found(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Found(evidence) => Some(evidence),
            _ => None,
        }
    }
}

/// Checks whether a token names a reachable website
pub trait WebsiteProbe {
    fn probe(&self, token: &str) -> ProbeOutcome;
}

/// Checks whether a token names a locally installed program
pub trait LocalAppFinder {
    fn find(&self, token: &str) -> ProbeOutcome;
}

/// Last-resort answer for a token nothing else could place.
///
/// Returns a path or a URL; anything starting with `http` is a website.
pub trait UnknownTokenResolver {
    fn resolve(&mut self, token: &str) -> io::Result<String>;
}

/// Canonical URL reported for a website hit, whatever suffix answered
pub fn canonical_url(token: &str) -> String {
    format!("https://{}.com", token)
}

/// Website probe over HTTPS
pub struct HttpWebsiteProbe {
    client: Result<reqwest::blocking::Client, String>,
}

impl HttpWebsiteProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string());
        Self { client }
    }

    fn check(client: &reqwest::blocking::Client, url: &str) -> Result<bool, ComandoError> {
        let resp = client
            .get(url)
            .send()
            .map_err(|e| ComandoError::Http(e.to_string()))?;
        Ok(resp.status().as_u16() < 400)
    }
}

impl WebsiteProbe for HttpWebsiteProbe {
    fn probe(&self, token: &str) -> ProbeOutcome {
        match &self.client {
            Ok(client) => probe_website_with(token, |url| Self::check(client, url)),
            Err(e) => ProbeOutcome::Unavailable(e.clone()),
        }
    }
}

/// Try each of [`WEBSITE_SUFFIXES`] in order with `check`, which returns
/// whether `url` answered with a success status.
///
/// The first success is reported as [`canonical_url`]. Errors and error
/// statuses move on to the next suffix. `Unavailable` only when no attempt
/// got an answer at all.
pub fn probe_website_with<F>(token: &str, check: F) -> ProbeOutcome
where
    F: Fn(&str) -> Result<bool, ComandoError>,
{
    let mut last_error = None;
    let mut answered = false;
    for suffix in WEBSITE_SUFFIXES {
        let url = format!("https://{}{}", token, suffix);
        match check(&url) {
            Ok(true) => {
                debug!("{} answered", url);
                return ProbeOutcome::Found(canonical_url(token));
            }
            Ok(false) => {
                debug!("{} answered with an error status", url);
                answered = true;
            }
            Err(e) => {
                debug!("{} unreachable: {}", url, e);
                last_error = Some(e.to_string());
            }
        }
    }

    // A DNS miss and a dead network look the same from here
    match last_error {
        Some(e) if !answered => ProbeOutcome::Unavailable(e),
        _ => ProbeOutcome::NotFound,
    }
}

/// Searches the directories of a `PATH`-style list for a file whose name
/// contains the token, ignoring case.
pub struct PathAppFinder {
    search_path: Option<OsString>,
}

impl PathAppFinder {
    /// Search the current process `PATH`
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl LocalAppFinder for PathAppFinder {
    fn find(&self, token: &str) -> ProbeOutcome {
        let search_path = match &self.search_path {
            Some(p) => p,
            None => return ProbeOutcome::Unavailable("PATH is not set".to_string()),
        };
        let needle = token.to_lowercase();

        for dir in std::env::split_paths(search_path) {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.to_lowercase().contains(&needle) {
                    debug!("'{}' matches {}", token, entry.path().display());
                    return ProbeOutcome::Found(name);
                }
            }
        }

        ProbeOutcome::NotFound
    }
}

/// Answers operator prompts from a fixed script, recording every question.
/// Runs out to an empty answer.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedResolver {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Tokens the resolver was asked about, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl UnknownTokenResolver for ScriptedResolver {
    fn resolve(&mut self, token: &str) -> io::Result<String> {
        self.asked.push(token.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

impl<T: UnknownTokenResolver + ?Sized> UnknownTokenResolver for &mut T {
    fn resolve(&mut self, token: &str) -> io::Result<String> {
        (**self).resolve(token)
    }
}

/// Source of operator answers, one line at a time.
///
/// `io::Stdin` locks per line, so an interactive session can keep reading
/// its own input from the same terminal.
pub trait LineReader {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineReader for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineReader for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Asks the operator on a terminal (or any reader/writer pair)
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<io::Stdin, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: LineReader, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: LineReader, W: Write> UnknownTokenResolver for PromptResolver<R, W> {
    fn resolve(&mut self, token: &str) -> io::Result<String> {
        writeln!(
            self.output,
            "[Assistente] Não encontrei '{}' como site ou aplicativo.",
            token
        )?;
        write!(
            self.output,
            "Por favor, informe o caminho do aplicativo ou o link do site para '{}': ",
            token
        )?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// How a token was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: DiscoveryOutcome,
    pub source: DiscoverySource,
    pub evidence: String,
}

/// Runs the discovery steps for one token at a time
pub struct DiscoveryResolver<'a> {
    website: Option<Box<dyn WebsiteProbe + 'a>>,
    local_apps: Option<Box<dyn LocalAppFinder + 'a>>,
    operator: Box<dyn UnknownTokenResolver + 'a>,
}

impl<'a> DiscoveryResolver<'a> {
    /// Resolver that only asks the operator; add probes with the `with_*`
    /// methods.
    pub fn new(operator: impl UnknownTokenResolver + 'a) -> Self {
        Self {
            website: None,
            local_apps: None,
            operator: Box::new(operator),
        }
    }

    pub fn with_website_probe(mut self, probe: impl WebsiteProbe + 'a) -> Self {
        self.website = Some(Box::new(probe));
        self
    }

    pub fn with_local_apps(mut self, finder: impl LocalAppFinder + 'a) -> Self {
        self.local_apps = Some(Box::new(finder));
        self
    }

    /// Real probes as configured, with the given operator prompt
    pub fn from_config(config: &DiscoveryConfig, operator: impl UnknownTokenResolver + 'a) -> Self {
        let mut resolver = Self::new(operator);
        if config.website_probe {
            resolver = resolver.with_website_probe(HttpWebsiteProbe::new(Duration::from_millis(
                config.probe_timeout_ms,
            )));
        }
        if config.local_app_probe {
            resolver = resolver.with_local_apps(PathAppFinder::from_env());
        }
        resolver
    }

    pub fn resolve(&mut self, token: &str) -> Resolution {
        if let Some(probe) = &self.website {
            match probe.probe(token) {
                ProbeOutcome::Found(url) => {
                    return Resolution {
                        outcome: DiscoveryOutcome::Website,
                        source: DiscoverySource::WebsiteProbe,
                        evidence: url,
                    }
                }
                ProbeOutcome::NotFound => debug!("'{}' is not a website", token),
                ProbeOutcome::Unavailable(e) => {
                    debug!("Website probe inconclusive for '{}': {}", token, e)
                }
            }
        }

        if let Some(finder) = &self.local_apps {
            match finder.find(token) {
                ProbeOutcome::Found(file) => {
                    return Resolution {
                        outcome: DiscoveryOutcome::Application,
                        source: DiscoverySource::LocalApp,
                        evidence: file,
                    }
                }
                ProbeOutcome::NotFound => debug!("'{}' is not a local application", token),
                ProbeOutcome::Unavailable(e) => {
                    warn!("Application search unavailable for '{}': {}", token, e)
                }
            }
        }

        let answer = match self.operator.resolve(token) {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                warn!("Operator prompt failed for '{}': {}", token, e);
                String::new()
            }
        };
        let outcome = if answer.starts_with("http") {
            DiscoveryOutcome::Website
        } else {
            DiscoveryOutcome::Application
        };
        Resolution {
            outcome,
            source: DiscoverySource::Operator,
            evidence: answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::TempDir;

    struct FixedProbe(ProbeOutcome, Rc<Cell<usize>>);

    impl WebsiteProbe for FixedProbe {
        fn probe(&self, _token: &str) -> ProbeOutcome {
            self.1.set(self.1.get() + 1);
            self.0.clone()
        }
    }

    impl LocalAppFinder for FixedProbe {
        fn find(&self, _token: &str) -> ProbeOutcome {
            self.1.set(self.1.get() + 1);
            self.0.clone()
        }
    }

    fn fixed(outcome: ProbeOutcome) -> (FixedProbe, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (FixedProbe(outcome, calls.clone()), calls)
    }

    #[test]
    fn test_website_hit_short_circuits() {
        let (web, _) = fixed(ProbeOutcome::Found(canonical_url("github")));
        let (apps, app_calls) = fixed(ProbeOutcome::Found("github-desktop".into()));
        let mut operator = ScriptedResolver::default();
        let mut resolver = DiscoveryResolver::new(&mut operator)
            .with_website_probe(web)
            .with_local_apps(apps);

        let r = resolver.resolve("github");
        drop(resolver);
        assert_eq!(r.outcome, DiscoveryOutcome::Website);
        assert_eq!(r.source, DiscoverySource::WebsiteProbe);
        assert_eq!(r.evidence, "https://github.com");
        assert_eq!(app_calls.get(), 0);
        assert!(operator.asked().is_empty());
    }

    #[test]
    fn test_local_app_after_website_miss() {
        let (web, web_calls) = fixed(ProbeOutcome::Unavailable("offline".into()));
        let (apps, _) = fixed(ProbeOutcome::Found("obs-studio".into()));
        let mut resolver = DiscoveryResolver::new(ScriptedResolver::default())
            .with_website_probe(web)
            .with_local_apps(apps);

        let r = resolver.resolve("obs");
        assert_eq!(web_calls.get(), 1);
        assert_eq!(r.outcome, DiscoveryOutcome::Application);
        assert_eq!(r.source, DiscoverySource::LocalApp);
        assert_eq!(r.evidence, "obs-studio");
    }

    #[test]
    fn test_operator_url_answer_is_website() {
        let (web, _) = fixed(ProbeOutcome::NotFound);
        let (apps, _) = fixed(ProbeOutcome::NotFound);
        let mut operator = ScriptedResolver::new(["  https://intranet.local  "]);
        let mut resolver = DiscoveryResolver::new(&mut operator)
            .with_website_probe(web)
            .with_local_apps(apps);

        let r = resolver.resolve("intranet");
        drop(resolver);
        assert_eq!(r.outcome, DiscoveryOutcome::Website);
        assert_eq!(r.source, DiscoverySource::Operator);
        assert_eq!(r.evidence, "https://intranet.local");
        assert_eq!(operator.asked(), ["intranet".to_string()]);
    }

    #[test]
    fn test_operator_path_or_empty_answer_is_application() {
        let mut resolver = DiscoveryResolver::new(ScriptedResolver::new(["/opt/tool/bin/tool"]));
        assert_eq!(resolver.resolve("tool").outcome, DiscoveryOutcome::Application);
        // Script exhausted: empty answer still resolves
        let r = resolver.resolve("outro");
        assert_eq!(r.outcome, DiscoveryOutcome::Application);
        assert_eq!(r.evidence, "");
    }

    #[test]
    fn test_operator_io_error_resolves_to_application() {
        struct Closed;
        impl UnknownTokenResolver for Closed {
            fn resolve(&mut self, _token: &str) -> io::Result<String> {
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
            }
        }
        let mut resolver = DiscoveryResolver::new(Closed);
        assert_eq!(resolver.resolve("x").outcome, DiscoveryOutcome::Application);
    }

    #[test]
    fn test_path_finder_matches_case_insensitively() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("Spotify-Launcher"), "").unwrap();

        let search = std::env::join_paths([
            first.path().to_path_buf(),
            first.path().join("does-not-exist"),
            second.path().to_path_buf(),
        ])
        .unwrap();
        let finder = PathAppFinder::with_search_path(search);

        assert_eq!(finder.find("spotify"), ProbeOutcome::Found("Spotify-Launcher".into()));
        assert_eq!(finder.find("LAUNCHER").found(), Some("Spotify-Launcher"));
        assert_eq!(finder.find("gimp"), ProbeOutcome::NotFound);
    }

    #[test]
    fn test_path_finder_prefers_earlier_directory() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("vlc"), "").unwrap();
        fs::write(second.path().join("vlc-wrapper"), "").unwrap();

        let search = std::env::join_paths([first.path(), second.path()]).unwrap();
        let finder = PathAppFinder::with_search_path(search);
        assert_eq!(finder.find("vlc"), ProbeOutcome::Found("vlc".into()));
    }

    #[test]
    fn test_path_finder_without_path_is_unavailable() {
        let finder = PathAppFinder { search_path: None };
        assert!(matches!(finder.find("vlc"), ProbeOutcome::Unavailable(_)));
    }

    #[test]
    fn test_prompt_resolver_reads_one_line() {
        let input = io::Cursor::new(b"/usr/bin/foo\nignored\n".to_vec());
        let mut output = Vec::new();
        let mut prompt = PromptResolver::new(input, &mut output);

        assert_eq!(prompt.resolve("foo").unwrap(), "/usr/bin/foo");
        drop(prompt);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Não encontrei 'foo'"));
        assert!(shown.ends_with("para 'foo': "));
    }

    #[test]
    fn test_prompt_resolver_end_of_input_is_empty() {
        let mut prompt = PromptResolver::new(io::Cursor::new(Vec::new()), io::sink());
        assert_eq!(prompt.resolve("foo").unwrap(), "");
    }

    #[test]
    fn test_canonical_url_is_dot_com() {
        assert_eq!(canonical_url("uol"), "https://uol.com");
    }

    /// Replays one canned answer per URL and records the URLs asked for
    fn replay(
        answers: Vec<Result<bool, ComandoError>>,
    ) -> (impl Fn(&str) -> Result<bool, ComandoError>, Rc<RefCell<Vec<String>>>) {
        let asked = Rc::new(RefCell::new(Vec::new()));
        let answers = RefCell::new(VecDeque::from(answers));
        let log = asked.clone();
        let check = move |url: &str| {
            log.borrow_mut().push(url.to_string());
            answers
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ComandoError::Http("no answer left".into())))
        };
        (check, asked)
    }

    #[test]
    fn test_website_dot_com_hit_stops_early() {
        let (check, asked) = replay(vec![Ok(true)]);
        assert_eq!(
            probe_website_with("youtube", check),
            ProbeOutcome::Found("https://youtube.com".into())
        );
        assert_eq!(*asked.borrow(), vec!["https://youtube.com"]);
    }

    #[test]
    fn test_website_dot_com_br_hit_reports_dot_com() {
        let (check, asked) = replay(vec![
            Err(ComandoError::Http("connection refused".into())),
            Ok(true),
        ]);
        assert_eq!(
            probe_website_with("globo", check),
            ProbeOutcome::Found("https://globo.com".into())
        );
        assert_eq!(*asked.borrow(), vec!["https://globo.com", "https://globo.com.br"]);
    }

    #[test]
    fn test_website_error_statuses_are_not_found() {
        let (check, asked) = replay(vec![Ok(false), Ok(false)]);
        assert_eq!(probe_website_with("zzqx", check), ProbeOutcome::NotFound);
        assert_eq!(asked.borrow().len(), 2);
    }

    #[test]
    fn test_website_status_and_error_mix_is_not_found() {
        let (check, _) = replay(vec![Ok(false), Err(ComandoError::Http("timeout".into()))]);
        assert_eq!(probe_website_with("zzqx", check), ProbeOutcome::NotFound);
    }

    #[test]
    fn test_website_all_errors_is_unavailable() {
        let (check, _) = replay(vec![
            Err(ComandoError::Http("dns".into())),
            Err(ComandoError::Http("timeout".into())),
        ]);
        match probe_website_with("zzqx", check) {
            ProbeOutcome::Unavailable(e) => assert!(e.contains("timeout"), "got {}", e),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }
}
