use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub voting: VotingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// punten_totaal 的计算方式 (由部署方决定)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreWeighting {
    /// sum(points)
    #[default]
    #[serde(rename = "none")]
    Unweighted,
    /// sum(points) * wegingsfactor
    Multiply,
}

impl std::str::FromStr for ScoreWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ScoreWeighting::Unweighted),
            "multiply" => Ok(ScoreWeighting::Multiply),
            other => Err(format!("unknown score weighting: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingConfig {
    /// 查看结果所需的共享密钥，为空表示未配置
    #[serde(default)]
    pub results_key: String,
    /// 是否只允许对当前活动轮次的地点投票
    #[serde(default = "default_require_active_event")]
    pub require_active_event: bool,
    #[serde(default)]
    pub weighting: ScoreWeighting,
    /// 拼接 toelichting_bundel 时使用的分隔符
    #[serde(default = "default_comment_separator")]
    pub comment_separator: String,
}

fn default_require_active_event() -> bool {
    true
}

fn default_comment_separator() -> String {
    " | ".to_string()
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            results_key: String::new(),
            require_active_event: default_require_active_event(),
            weighting: ScoreWeighting::default(),
            comment_separator: default_comment_separator(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    voting: VotingConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("RESULTS_VIEW_KEY") {
            config.voting.results_key = v;
        }
        if let Ok(v) = env::var("REQUIRE_ACTIVE_EVENT")
            && let Ok(b) = v.parse()
        {
            config.voting.require_active_event = b;
        }
        if let Ok(v) = env::var("SCORE_WEIGHTING") {
            config.voting.weighting = v.parse()?;
        }
        if let Ok(v) = env::var("COMMENT_SEPARATOR") {
            config.voting.comment_separator = v;
        }

        if config.voting.results_key.is_empty() {
            log::warn!("RESULTS_VIEW_KEY is not configured; results endpoints will refuse requests");
        }

        Ok(config)
    }

    /// 解析 TOML 配置内容
    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("failed to parse config file: {e}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [database]
            url = "postgres://localhost/stembus"
            max_connections = 5

            [voting]
            results_key = "geheim"
            require_active_event = false
            weighting = "multiply"
            comment_separator = "; "
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.voting.results_key, "geheim");
        assert!(!config.voting.require_active_event);
        assert_eq!(config.voting.weighting, ScoreWeighting::Multiply);
        assert_eq!(config.voting.comment_separator, "; ");
    }

    #[test]
    fn test_voting_section_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/stembus"
            max_connections = 10
            "#,
        )
        .unwrap();

        assert!(config.voting.results_key.is_empty());
        assert!(config.voting.require_active_event);
        assert_eq!(config.voting.weighting, ScoreWeighting::Unweighted);
        assert_eq!(config.voting.comment_separator, " | ");
    }

    #[test]
    fn test_score_weighting_from_str() {
        assert_eq!("none".parse::<ScoreWeighting>(), Ok(ScoreWeighting::Unweighted));
        assert_eq!(" Multiply ".parse::<ScoreWeighting>(), Ok(ScoreWeighting::Multiply));
        assert!("squared".parse::<ScoreWeighting>().is_err());
    }
}
