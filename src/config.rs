use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::services::prompt_composer::PromptConfig;

const DEFAULT_MODEL: &str = "gpt-5-mini";
const DEFAULT_CONTEXT_CHAR_LIMIT: usize = 60_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub question_sets_collection: String,
    pub counters_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub llm_api_key: Option<SecretString>,
    pub llm_api_base: Option<String>,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub context_char_limit: usize,
    pub canvas_export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let llm_temperature = env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or_else(|| default_temperature(&llm_model));

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "instructor-assistant".to_string()),
            question_sets_collection: env::var("QUESTION_SETS_COLLECTION")
                .unwrap_or_else(|_| "question_sets".to_string()),
            counters_collection: env::var("COUNTERS_COLLECTION")
                .unwrap_or_else(|_| "counters".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8010),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_else(|_| default_origins()),
            llm_api_key: env::var("OPENAI_API_KEY")
                .or_else(|_| env::var("LITELLM_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            llm_api_base: env::var("LLM_API_BASE").ok().filter(|b| !b.trim().is_empty()),
            llm_model,
            llm_temperature,
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(4000),
            context_char_limit: env::var("QUESTION_CONTEXT_CHAR_LIMIT")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(DEFAULT_CONTEXT_CHAR_LIMIT),
            canvas_export_dir: env::var("CANVAS_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("exports/canvas")),
        }
    }

    /// Snapshot of the prompt settings handed to the composer on every call.
    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig::default().with_context_char_limit(self.context_char_limit)
    }

    /// Reasoning models reject `max_tokens` and want `max_completion_tokens`.
    pub fn uses_completion_token_limit(&self) -> bool {
        is_gpt5_family(&self.llm_model)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "instructor-assistant-test".to_string(),
            question_sets_collection: "question_sets".to_string(),
            counters_collection: "counters".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8010,
            cors_allowed_origins: default_origins(),
            llm_api_key: None,
            llm_api_base: None,
            llm_model: "gpt-4o-mini".to_string(),
            llm_temperature: 0.2,
            llm_max_tokens: 4000,
            context_char_limit: 1_000,
            canvas_export_dir: PathBuf::from("exports/canvas-test"),
        }
    }
}

fn is_gpt5_family(model: &str) -> bool {
    model.to_lowercase().contains("gpt-5")
}

fn default_temperature(model: &str) -> f32 {
    if is_gpt5_family(model) {
        1.0
    } else {
        0.2
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_origins() -> Vec<String> {
    [
        "http://localhost:5173",
        "http://127.0.0.1:5173",
        "http://localhost:5174",
        "http://127.0.0.1:5174",
    ]
    .iter()
    .map(|origin| origin.to_string())
    .collect()
}
