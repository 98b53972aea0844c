//! 설정 파일 관리.
//!
//! JSON 설정 파일 하나를 소유한다. 파일이 없으면 기본 설정을 기록하고,
//! 실행 단위 오버라이드([`ConfigOverrides`])는 파일에 쓰지 않고 유효 설정에만 반영한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 실행 단위 설정 오버라이드 (CLI 인자 등). `None`/`false`인 항목은 파일 값을 따른다
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub mask_path: Option<PathBuf>,
    pub frames_dir: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub step: Option<u64>,
    pub diff_threshold: Option<f64>,
    /// 스트림 끝에서 되감지 않음
    pub no_loop: bool,
}

impl ConfigOverrides {
    /// 설정에 오버라이드 적용
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(path) = &self.mask_path {
            config.source.mask_path = path.clone();
        }
        if let Some(dir) = &self.frames_dir {
            config.source.frames_dir = dir.clone();
        }
        if let Some(path) = &self.snapshot_path {
            config.snapshot.path = path.clone();
        }
        if let Some(step) = self.step {
            config.engine.step = step;
        }
        if let Some(threshold) = self.diff_threshold {
            config.engine.diff_threshold = threshold;
        }
        if self.no_loop {
            config.source.loop_on_end = false;
        }
    }
}

/// 설정 관리자
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 지정된 경로의 설정 파일 열기
    ///
    /// 상위 디렉토리가 없으면 만들고, 파일이 없으면 기본 설정을 기록한다.
    /// 읽은 설정이 유효하지 않으면 `CoreError::Validation`.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent_dir(&config_path)?;

        let config = if config_path.exists() {
            read_config(&config_path)?
        } else {
            let config = AppConfig::default_config();
            write_config(&config_path, &config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            config
        };
        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 파일에 저장된 설정 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// 오버라이드를 반영한 이번 실행의 유효 설정. 파일은 바뀌지 않는다
    pub fn effective(&self, overrides: &ConfigOverrides) -> Result<AppConfig, CoreError> {
        let mut config = self.get();
        overrides.apply_to(&mut config);
        config.validate()?;
        if *overrides != ConfigOverrides::default() {
            debug!("설정 오버라이드 적용: {overrides:?}");
        }
        Ok(config)
    }

    /// 설정 수정 후 파일 저장. 검증에 실패하면 파일과 메모리 모두 그대로 둔다
    pub fn update_with<F>(&mut self, updater: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        updater(&mut config);
        config.validate()?;
        write_config(&self.config_path, &config)?;
        self.config = config.clone();
        debug!("설정 저장: {}", self.config_path.display());
        Ok(config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 파일에서 다시 읽기. 실패하면 기존 설정 유지
    pub fn reload(&mut self) -> Result<(), CoreError> {
        let config = read_config(&self.config_path)?;
        config.validate()?;
        self.config = config;
        info!("설정 다시 로드: {}", self.config_path.display());
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), CoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
    })?;
    info!("설정 디렉토리 생성: {}", parent.display());
    Ok(())
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("설정 읽기 실패: {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| CoreError::Config(format!("설정 파싱 실패: {}: {e}", path.display())))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .map_err(|e| CoreError::Config(format!("설정 저장 실패: {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(dir.path().join(CONFIG_FILE_NAME)).unwrap()
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.config_path(), config_path.as_path());
        assert_eq!(manager.get().engine.step, 30);
        assert_eq!(
            manager.get().snapshot.path,
            PathBuf::from("empty_slots.txt")
        );
    }

    #[test]
    fn overrides_are_not_persisted() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        let overrides = ConfigOverrides {
            mask_path: Some(PathBuf::from("lot.png")),
            step: Some(5),
            diff_threshold: Some(0.2),
            no_loop: true,
            ..Default::default()
        };
        let effective = manager.effective(&overrides).unwrap();
        assert_eq!(effective.source.mask_path, PathBuf::from("lot.png"));
        assert_eq!(effective.engine.step, 5);
        assert!(!effective.source.loop_on_end);
        assert_eq!(effective.source.frames_dir, PathBuf::from("frames"));

        let reopened = manager_in(&dir).get();
        assert_eq!(reopened.engine.step, 30);
        assert!(reopened.source.loop_on_end);
    }

    #[test]
    fn invalid_override_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let overrides = ConfigOverrides {
            diff_threshold: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            manager.effective(&overrides),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn update_persists_and_invalid_update_does_not() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);

        manager.update_with(|c| c.list.visible_count = 8).unwrap();
        assert!(manager.update_with(|c| c.engine.step = 0).is_err());
        assert_eq!(manager.get().engine.step, 30);

        let reopened = manager_in(&dir).get();
        assert_eq!(reopened.list.visible_count, 8);
        assert_eq!(reopened.engine.step, 30);
    }

    #[test]
    fn reload_picks_up_external_edit() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);

        let mut edited = manager.get();
        edited.alert.low_vacancy_ratio = 0.2;
        fs::write(
            manager.config_path(),
            serde_json::to_string_pretty(&edited).unwrap(),
        )
        .unwrap();

        manager.reload().unwrap();
        assert!((manager.get().alert.low_vacancy_ratio - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "{ not json").unwrap();

        let err = ConfigManager::with_path(config_path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
