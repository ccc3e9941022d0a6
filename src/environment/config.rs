use std::fs;
use std::path::Path;

use crate::Result;
use crate::environment::types::EnvironmentConfig;
use crate::model::Test;

/// 环境配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "jmxforge.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<EnvironmentConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/jmxforge/
    pub fn find_and_load() -> Option<EnvironmentConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        Self::try_load_from_user_dir()
    }

    fn try_load_from_current_dir() -> Option<EnvironmentConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_logged(&config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<EnvironmentConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("jmxforge").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_logged(&config_path)
        } else {
            None
        }
    }

    fn load_logged(path: &Path) -> Option<EnvironmentConfig> {
        match Self::load_from_path(path) {
            Ok(config) => {
                tracing::debug!("Loaded environments from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                None
            }
        }
    }

    /// 为引用了环境 id 但尚未携带环境数据的场景填充环境
    ///
    /// 返回被填充的场景数量
    pub fn attach(config: &EnvironmentConfig, test: &mut Test) -> usize {
        let mut attached = 0;
        for scenario in &mut test.scenario_definition {
            if scenario.environment.is_some() {
                continue;
            }
            let Some(id) = scenario.environment_id.as_deref() else {
                continue;
            };
            match config.get_environment(id) {
                Some(env) => {
                    let mut env = env.clone();
                    env.id.get_or_insert_with(|| id.to_string());
                    scenario.environment = Some(env);
                    attached += 1;
                }
                None => tracing::warn!("Environment '{}' not found in config", id),
            }
        }
        attached
    }
}
