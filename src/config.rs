//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(또는 `.env` 파일)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `MONGODB_URI`: 지정하면 MongoDB 문서 저장소를 사용합니다 (우선순위 높음)
//! - `MONGODB_DATABASE`: MongoDB 데이터베이스 이름 (기본값: `docsapp`)
//! - `DATABASE_URL`: `MONGODB_URI`가 없을 때 사용하는 SQLite 경로
//! - `HOST` / `PORT`: 서버 바인딩 주소 (기본값: `0.0.0.0:5000`)
//! - `STATIC_DIR`: 빌드된 프론트엔드 디렉토리 (선택)
//! - `SEED`: `false` 또는 `0`이면 시드 문서를 넣지 않습니다

use std::env;

use thiserror::Error;

const DEFAULT_MONGODB_DATABASE: &str = "docsapp";
const DEFAULT_PORT: u16 = 5000;

/// 설정 로딩 실패
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MONGODB_URI or DATABASE_URL must be set")]
    MissingDatabase,
}

/// 어느 저장소 백엔드를 쓸지와 그 연결 정보
///
/// 두 백엔드는 서로 배타적이며, 시작 시점에 어떤 연결 정보가 있는지로 결정됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// 관계형 테이블 (예: "sqlite:data/docs.db?mode=rwc")
    Sqlite { database_url: String },
    /// 문서 컬렉션
    Mongo { uri: String, database: String },
}

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub host: String,
    pub port: u16,
    /// 프론트엔드 정적 파일 디렉토리 (없으면 API만 서빙)
    pub static_dir: Option<String>,
    /// 빈 저장소에 시드 문서를 넣을지 여부
    pub seed: bool,
}

impl Config {
    /// 프로세스 환경변수에서 설정을 읽습니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 구성합니다. `from_env`는 여기에 `env::var`를 넘깁니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열은 설정되지 않은 것으로 취급합니다.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match (var("MONGODB_URI"), var("DATABASE_URL")) {
            (Some(uri), _) => StorageConfig::Mongo {
                uri,
                database: var("MONGODB_DATABASE")
                    .unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string()),
            },
            (None, Some(database_url)) => StorageConfig::Sqlite { database_url },
            (None, None) => return Err(ConfigError::MissingDatabase),
        };

        Ok(Self {
            storage,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: var("STATIC_DIR"),
            seed: var("SEED")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        })
    }
}
