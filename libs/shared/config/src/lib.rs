use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SAMPLE_SLOT_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub seed_sample_data: bool,
    pub sample_slot_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            seed_sample_data: true,
            sample_slot_days: DEFAULT_SAMPLE_SLOT_DAYS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            host: lookup("HOST").or(defaults.host),
            port: match lookup("PORT") {
                EnvSetting::Missing => {
                    warn!("PORT not set, using default {}", DEFAULT_PORT);
                    defaults.port
                }
                setting => setting.or(defaults.port),
            },
            seed_sample_data: lookup("SEED_SAMPLE_DATA").or(defaults.seed_sample_data),
            sample_slot_days: lookup("SAMPLE_SLOT_DAYS").or(defaults.sample_slot_days),
        };

        if config.seed_sample_data && config.sample_slot_days == 0 {
            warn!("SEED_SAMPLE_DATA is enabled but SAMPLE_SLOT_DAYS is 0, no slots will be seeded");
        }

        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Outcome of reading one environment variable.
#[derive(Debug, PartialEq)]
enum EnvSetting<T> {
    Missing,
    Invalid,
    Value(T),
}

impl<T> EnvSetting<T> {
    fn or(self, default: T) -> T {
        match self {
            EnvSetting::Value(value) => value,
            EnvSetting::Missing | EnvSetting::Invalid => default,
        }
    }
}

fn lookup<T: std::str::FromStr>(key: &str) -> EnvSetting<T> {
    classify(key, env::var(key).ok())
}

/// Invalid values are logged here; missing ones are left to the caller.
fn classify<T: std::str::FromStr>(key: &str, raw: Option<String>) -> EnvSetting<T> {
    let Some(raw) = raw else {
        return EnvSetting::Missing;
    };
    match raw.trim().parse() {
        Ok(value) => EnvSetting::Value(value),
        Err(_) => {
            warn!("{} has invalid value {:?}, using default", key, raw);
            EnvSetting::Invalid
        }
    }
}
