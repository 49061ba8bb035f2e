//! Database connection pool management
//!
//! The pool is the single process-wide store handle; sqlx makes it safe to
//! share across concurrent handlers.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Credentials and location of the store
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub user: String,
    pub password: String,
    /// `host` or `host:port`
    pub host: String,
    /// Empty means the server's default database for `user`
    pub name: String,
}

impl DbSettings {
    /// Assemble connection options without going through a URL string.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .username(&self.user)
            .password(&self.password);

        options = match split_host_port(&self.host) {
            (host, Some(port)) => options.host(host).port(port),
            (host, None) => options.host(host),
        };

        if !self.name.is_empty() {
            options = options.database(&self.name);
        }
        options
    }
}

/// Split `host`, `host:port`, `[v6]`, or `[v6]:port`.
///
/// A bare value with more than one `:` is an IPv6 address with no port.
fn split_host_port(raw: &str) -> (&str, Option<u16>) {
    if let Some(rest) = raw.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (host, port);
        }
        return (raw, None);
    }

    match raw.split_once(':') {
        Some((host, port)) if !host.is_empty() && !port.contains(':') => {
            match port.parse() {
                Ok(port) => (host, Some(port)),
                Err(_) => (raw, None),
            }
        }
        _ => (raw, None),
    }
}

/// Create a pool without touching the network.
///
/// Connections are opened on first use; pair with [`wait_until_ready`] to
/// block until the store answers.
pub fn create_lazy_pool(settings: &DbSettings) -> PgPool {
    create_lazy_pool_with_options(settings.connect_options(), DEFAULT_MAX_CONNECTIONS)
}

/// Create a lazy pool with custom options.
pub fn create_lazy_pool_with_options(options: PgConnectOptions, max_connections: u32) -> PgPool {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options)
}

/// Liveness check: a round trip through one pooled connection.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// How the startup readiness wait behaves
#[derive(Debug, Clone, Copy)]
pub struct ReadinessPolicy {
    /// Pause before each attempt
    pub interval: Duration,
    /// Give up after this many failed attempts
    pub max_attempts: u32,
    /// Longest a single attempt may wait on the network
    pub attempt_timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            max_attempts: 150,
            attempt_timeout: Duration::from_millis(200),
        }
    }
}

/// The store never answered within the readiness policy
#[derive(Debug, thiserror::Error)]
#[error("database not reachable after {attempts} attempt(s): {last_error}")]
pub struct NotReady {
    pub attempts: u32,
    #[source]
    pub last_error: sqlx::Error,
}

/// Poll the store on a fixed interval until a check succeeds or the attempt
/// budget runs out. Returns the number of attempts used.
///
/// Worst case is `max_attempts * (interval + attempt_timeout)`.
pub async fn wait_until_ready(pool: &PgPool, policy: ReadinessPolicy) -> Result<u32, NotReady> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        tokio::time::sleep(policy.interval).await;
        let checked = match tokio::time::timeout(policy.attempt_timeout, ping(pool)).await {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::PoolTimedOut),
        };
        match checked {
            Ok(()) => return Ok(attempt),
            Err(err) if attempt >= policy.max_attempts => {
                return Err(NotReady {
                    attempts: attempt,
                    last_error: err,
                })
            }
            Err(err) => {
                tracing::debug!(attempt, error = %err, "database not ready yet");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(host: &str, name: &str) -> DbSettings {
        DbSettings {
            user: "arbor".into(),
            password: "p@ss:word/".into(),
            host: host.into(),
            name: name.into(),
        }
    }

    #[test]
    fn host_with_port() {
        let options = settings("db.internal:6543", "neighborhood").connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("neighborhood"));
        assert_eq!(options.get_username(), "arbor");
    }

    #[test]
    fn host_without_port() {
        let options = settings("db.internal", "").connect_options();
        assert_eq!(options.get_host(), "db.internal");
    }

    #[test]
    fn splits_host_and_port() {
        assert_eq!(split_host_port("db:5432"), ("db", Some(5432)));
        assert_eq!(split_host_port("db"), ("db", None));
        assert_eq!(split_host_port("db:notaport"), ("db:notaport", None));
    }

    #[test]
    fn ipv6_hosts() {
        assert_eq!(split_host_port("::1"), ("::1", None));
        assert_eq!(split_host_port("fe80::1:2"), ("fe80::1:2", None));
        assert_eq!(split_host_port("[::1]:5432"), ("::1", Some(5432)));
        assert_eq!(split_host_port("[::1]"), ("::1", None));

        let options = settings("[::1]:6543", "").connect_options();
        assert_eq!(options.get_host(), "::1");
        assert_eq!(options.get_port(), 6543);

        let options = settings("::1", "").connect_options();
        assert_eq!(options.get_host(), "::1");
    }

    #[test]
    fn default_policy_polls_every_200ms() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(200));
        assert!(policy.max_attempts > 0);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        // Port 1 on localhost refuses connections immediately.
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy_with(settings("127.0.0.1:1", "none").connect_options());
        let policy = ReadinessPolicy {
            interval: Duration::from_millis(1),
            max_attempts: 2,
            attempt_timeout: Duration::from_millis(200),
        };
        let err = wait_until_ready(&pool, policy).await.unwrap_err();
        assert_eq!(err.attempts, 2);
    }

    #[tokio::test]
    async fn slow_attempt_is_cut_off() {
        // Non-routable address: packets are dropped, so only the attempt
        // timeout bounds each attempt.
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(30))
            .connect_lazy_with(settings("10.255.255.1:5432", "none").connect_options());
        let policy = ReadinessPolicy {
            interval: Duration::from_millis(1),
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(50),
        };
        let started = std::time::Instant::now();
        let err = wait_until_ready(&pool, policy).await.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_becomes_ready() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let options: PgConnectOptions = url.parse().expect("bad DATABASE_URL");
        let pool = create_lazy_pool_with_options(options, 2);
        let attempts = wait_until_ready(&pool, ReadinessPolicy::default())
            .await
            .expect("database not ready");
        assert_eq!(attempts, 1);
    }
}
