use validator::ValidateUrl;

pub struct Env {
    pub jwt_secret: String,
    pub database_url: String,
    pub redis_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub frontend_url: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub notification_expiry_days: u32,
    pub notification_sweep_secs: u64,
    pub ip: String,
    pub port: u16,
}

pub const USER_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;
pub const MAX_MESSAGE_LIMIT: i64 = 100;
pub const DEFAULT_AI_NAME: &str = "AI Assistant";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/uploads";
pub const MAX_NOTIFICATION_EXPIRY_DAYS: u32 = 3650;

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set in .env file or environment variable");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .expect("OPENAI_API_KEY must be set in .env file or environment variable");
        let openai_model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let openai_base_url = std::env::var("OPENAI_BASE_URL").ok();

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
        // uploaded URLs are sent back as message media URLs, which must be absolute
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());
        assert!(public_base_url.validate_url(), "PUBLIC_BASE_URL must be an absolute URL");
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_BYTES must be a valid usize integer");

        let notification_expiry_days = std::env::var("NOTIFICATION_EXPIRY_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u32>()
            .ok()
            .filter(|days| *days <= MAX_NOTIFICATION_EXPIRY_DAYS)
            .expect("NOTIFICATION_EXPIRY_DAYS must be an integer between 0 and 3650");
        let notification_sweep_secs = std::env::var("NOTIFICATION_SWEEP_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .expect("NOTIFICATION_SWEEP_SECS must be a positive u64 integer");

        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            jwt_secret,
            database_url,
            redis_url,
            openai_api_key,
            openai_model,
            openai_base_url,
            frontend_url,
            upload_dir,
            public_base_url,
            max_upload_bytes,
            notification_expiry_days,
            notification_sweep_secs,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
