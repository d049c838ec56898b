// ABOUTME: Command-line and environment configuration for the server
// ABOUTME: Every flag has an env fallback so deployments can rely on a .env file

use clap::Parser;

/// Default cap for a single uploaded document (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "legalflow", version, about = "Practice management backend for a law office")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "LEGALFLOW_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SeaORM connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:legalflow.db?mode=rwc")]
    pub database_url: String,

    /// Mark session cookies Secure (set when served over HTTPS)
    #[arg(long, env = "LEGALFLOW_SECURE_COOKIES", default_value_t = false)]
    pub secure_cookies: bool,

    /// Session lifetime in seconds
    #[arg(long, env = "LEGALFLOW_SESSION_MAX_AGE", default_value_t = 24 * 60 * 60)]
    pub session_max_age_secs: i64,

    /// Largest accepted document upload in bytes
    #[arg(long, env = "LEGALFLOW_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Remote folder uploaded documents are placed in
    #[arg(long, env = "LEGALFLOW_UPLOAD_FOLDER", default_value = "legalflow_docs")]
    pub upload_folder: String,

    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    pub cloudinary_cloud_name: Option<String>,

    #[arg(long, env = "CLOUDINARY_API_KEY")]
    pub cloudinary_api_key: Option<String>,

    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    pub cloudinary_api_secret: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LEGALFLOW_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cloudinary credentials, present only when all three parts are set.
    pub fn cloudinary(&self) -> Option<CloudinaryCredentials> {
        match (
            &self.cloudinary_cloud_name,
            &self.cloudinary_api_key,
            &self.cloudinary_api_secret,
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryCredentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
