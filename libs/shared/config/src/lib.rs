use std::env;
use tracing::warn;

/// Which document store backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Doctor assigned to same-day visits created at patient registration
    /// when the request does not name one.
    pub default_doctor_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| match value.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("PORT is not a valid port number ({}), using 3000", value);
                    None
                }
            })
            .unwrap_or(3000);

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("supabase") => StoreBackend::Supabase,
            Ok("memory") => StoreBackend::Memory,
            Ok(other) => {
                warn!("Unknown STORE_BACKEND '{}', using in-memory store", other);
                StoreBackend::Memory
            }
            Err(_) => {
                warn!("STORE_BACKEND not set, using in-memory store");
                StoreBackend::Memory
            }
        };

        let config = Self {
            port,
            store_backend,
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            default_doctor_id: env::var("DEFAULT_DOCTOR_ID").ok().filter(|id| !id.is_empty()),
        };

        if config.default_doctor_id.is_none() {
            warn!("DEFAULT_DOCTOR_ID not set, registration without doctorId cannot create a visit");
        }

        if config.store_backend == StoreBackend::Supabase && !config.is_supabase_configured() {
            warn!("Supabase store selected but not fully configured - missing environment variables");
        }

        config
    }

    /// Configuration for an in-memory service, used by tests and local runs.
    pub fn in_memory() -> Self {
        Self {
            port: 3000,
            store_backend: StoreBackend::Memory,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            default_doctor_id: None,
        }
    }

    pub fn is_supabase_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}
