use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::clock::{Clock, SystemClock};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{ClientStore, SqliteClientStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | db | DbService | 连接池 (懒连接) |
/// | store | Arc<dyn ClientStore> | 会员记录存储 |
/// | clock | Arc<dyn Clock> | "今天" 的来源 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub store: Arc<dyn ClientStore>,
    pub clock: Arc<dyn Clock>,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: DbService,
        store: Arc<dyn ClientStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            store,
            clock,
        }
    }

    /// 初始化服务器状态
    ///
    /// 不连接数据库：首个请求才会建立连接并执行迁移。
    pub fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database)?;
        let store = Arc::new(SqliteClientStore::new(db.clone()));
        let clock = Arc::new(SystemClock::new(config.timezone));

        tracing::info!(
            database = %config.database.url,
            timezone = %config.timezone,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db, store, clock))
    }

    /// 测试用：SQLite 存储 + 指定时钟
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = DbService::new(&config.database)?;
        let store = Arc::new(SqliteClientStore::new(db.clone()));
        Ok(Self::new(config.clone(), db, store, clock))
    }

    /// Today in the business timezone
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
