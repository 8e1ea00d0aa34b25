pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 2;
pub const DEFAULT_ACCESS_TTL_SECS: usize = 15 * 60;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;
pub const MAX_ACCESS_TTL_SECS: usize = 7 * 24 * 60 * 60;
pub const MAX_REFRESH_TTL_DAYS: i64 = 3650;

// Development-only credentials, used when no auth section is configured in a
// debug build.
pub const DEV_JWT_SECRET: &str = "super-secret-change-me";
pub const DEV_ADMIN_USERNAME: &str = "admin";
pub const DEV_ADMIN_PASSWORD: &str = "adminpassword";
