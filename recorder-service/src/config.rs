use std::{env::var, fmt, path::PathBuf, sync::Arc};

use anyhow::Context;
use recorder::{
    ActivityFeed, ActivityRecorder, CoinLedger, MemoryStore, PostgrestStore, Presentation,
    RemoteStore, TransactionRecorder, Translator,
};
use sentry::types::Dsn;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub activities: ActivityRecorder,
    pub transactions: TransactionRecorder,
    pub ledger: CoinLedger,
    pub feed: ActivityFeed,
    pub presentation: Arc<Presentation>,
}

impl AppState {
    pub fn new(store: Arc<dyn RemoteStore>, presentation: Presentation) -> Self {
        let activities = ActivityRecorder::new(store.clone());
        let transactions = TransactionRecorder::new(store.clone());
        let ledger = CoinLedger::from_recorders(transactions.clone(), activities.clone());
        Self {
            activities,
            transactions,
            ledger,
            feed: ActivityFeed::new(store),
            presentation: Arc::new(presentation),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub environment: Environment,
    pub port: u16,
    pub request_body_size_limit: usize,
    pub request_timeout_in_ms: u64,
    pub sentry_dsn: Option<String>,
    /// `None` only for debug builds in development, which use the in-memory store
    pub supabase: Option<Supabase>,
    pub translations_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Supabase {
    pub url: String,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(s)
    }
}

impl EnvVars {
    pub fn new() -> Self {
        let environment = match var("ENVIRONMENT") {
            Ok(v) => v.into(),
            Err(_e) => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let sentry_dsn = match var("SENTRY_DSN") {
            Ok(dsn_string) => {
                assert!(
                    valid_sentry_dsn(&dsn_string),
                    "SENTRY_DSN is not valid DSN."
                );
                Some(dsn_string)
            }
            Err(_e) => {
                if cfg!(not(debug_assertions)) {
                    panic!("SENTRY_DSN is not allowed to be unset outside of a debug build");
                }
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        let supabase = match (var("SUPABASE_URL"), var("SUPABASE_KEY")) {
            (Ok(url), Ok(key)) => {
                assert!(!url.is_empty(), "SUPABASE_URL must not be empty");
                assert!(!key.is_empty(), "SUPABASE_KEY must not be empty");
                Some(Supabase { url, key })
            }
            _ if cfg!(debug_assertions) && environment == Environment::Development => {
                warn!("SUPABASE_URL or SUPABASE_KEY not set. Using in-memory store.");
                None
            }
            (url, _) => {
                if url.is_err() {
                    error!("SUPABASE_URL not set");
                    panic!("SUPABASE_URL required");
                }
                error!("SUPABASE_KEY not set");
                panic!("SUPABASE_KEY required");
            }
        };

        let port = match var("PORT") {
            Ok(port_string) => port_string.parse().expect("PORT to be parseable as u16"),
            Err(_e) => {
                let default_port = 3003;
                warn!("PORT not set. Defaulting to {default_port}");
                default_port
            }
        };

        let request_timeout_in_ms = match var("REQUEST_TIMEOUT_IN_MS") {
            Ok(s) => s
                .parse()
                .expect("REQUEST_TIMEOUT_IN_MS to be valid unsigned integer"),
            Err(_e) => {
                let default_request_timeout = 30_000;
                warn!("REQUEST_TIMEOUT_IN_MS not set. Defaulting to {default_request_timeout}");
                default_request_timeout
            }
        };

        let request_body_size_limit = match var("REQUEST_BODY_SIZE_LIMIT") {
            Ok(s) => s
                .parse()
                .expect("REQUEST_BODY_SIZE_LIMIT to be valid unsigned integer"),
            Err(_e) => {
                let default_request_body_size_limit = 1 << 20;
                warn!(
                    "REQUEST_BODY_SIZE_LIMIT not set. Defaulting to {default_request_body_size_limit}"
                );
                default_request_body_size_limit
            }
        };

        let translations_path = var("TRANSLATIONS_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        EnvVars {
            environment,
            port,
            request_body_size_limit,
            request_timeout_in_ms,
            sentry_dsn,
            supabase,
            translations_path,
        }
    }

    pub fn store(&self) -> Arc<dyn RemoteStore> {
        match &self.supabase {
            Some(supabase) => Arc::new(PostgrestStore::new(&supabase.url, &supabase.key)),
            None => Arc::new(MemoryStore::new()),
        }
    }

    /// Identity translation unless `TRANSLATIONS_PATH` points at a catalog
    pub fn presentation(&self) -> anyhow::Result<Presentation> {
        let translator = match &self.translations_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("unable to read translations from {path:?}"))?;
                Translator::from_json(&text).context("unable to parse translations")?
            }
            None => Translator::Identity,
        };

        Ok(Presentation {
            translator,
            ..Default::default()
        })
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
