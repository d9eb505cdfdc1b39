//! 副作用执行器
//!
//! 把 App 返回的 Effect 变成 tokio 任务；结果通过通道回到 UI 循环，
//! 由同一个 dispatch 入口应用

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::GeoApi;
use crate::navigation::Navigator;
use crate::ui::{Action, Effect};

pub struct Loader {
    api: Arc<dyn GeoApi>,
    tx: UnboundedSender<Action>,
    sub_region_task: Option<JoinHandle<()>>,
}

impl Loader {
    pub fn new(api: Arc<dyn GeoApi>, tx: UnboundedSender<Action>) -> Self {
        Self {
            api,
            tx,
            sub_region_task: None,
        }
    }

    /// 执行一批副作用，返回是否应退出界面
    pub fn run(&mut self, effects: Vec<Effect>, navigator: &mut dyn Navigator) -> bool {
        let mut leave = false;
        for effect in effects {
            match effect {
                Effect::LoadRegions => self.load_regions(),
                Effect::LoadSubRegions {
                    generation,
                    region_code,
                } => self.load_sub_regions(generation, region_code),
                Effect::CancelSubRegions => self.cancel_sub_regions(),
                Effect::Navigate(route) => {
                    self.cancel_sub_regions();
                    navigator.navigate(route);
                    leave = true;
                }
                Effect::Quit => leave = true,
            }
        }
        leave
    }

    pub fn load_regions(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_regions().await.map_err(|e| e.to_string());
            // 接收端已关闭说明界面已退出
            let _ = tx.send(Action::RegionsLoaded(result));
        });
    }

    /// 发起城市请求，并中止上一次尚未完成的请求
    pub fn load_sub_regions(&mut self, generation: u64, region_code: String) {
        self.cancel_sub_regions();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.sub_region_task = Some(tokio::spawn(async move {
            let result = api
                .list_sub_regions(&region_code)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::SubRegionsLoaded {
                generation,
                region_code,
                result,
            });
        }));
    }

    pub fn cancel_sub_regions(&mut self) {
        if let Some(task) = self.sub_region_task.take() {
            if !task.is_finished() {
                tracing::debug!("aborting superseded sub-region request");
                task.abort();
            }
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.cancel_sub_regions();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::error::{AppError, Result};
    use crate::models::{Region, SubRegion};
    use crate::navigation::{HandoffNavigator, Route};
    use crate::ui::App;

    /// 内存中的假数据源，每个州可设定响应延迟
    struct FakeGeoApi {
        regions: Vec<Region>,
        cities: HashMap<&'static str, (Duration, Vec<&'static str>)>,
    }

    #[async_trait]
    impl GeoApi for FakeGeoApi {
        async fn list_regions(&self) -> Result<Vec<Region>> {
            Ok(self.regions.clone())
        }

        async fn list_sub_regions(&self, region_code: &str) -> Result<Vec<SubRegion>> {
            let Some((delay, names)) = self.cities.get(region_code) else {
                return Err(AppError::Status {
                    status: 404,
                    url: region_code.to_string(),
                });
            };
            tokio::time::sleep(*delay).await;
            Ok(names
                .iter()
                .map(|name| SubRegion {
                    name: name.to_string(),
                })
                .collect())
        }
    }

    fn fake_api() -> Arc<dyn GeoApi> {
        let mut cities = HashMap::new();
        cities.insert("RJ", (Duration::from_millis(500), vec!["Niterói"]));
        cities.insert("SP", (Duration::from_millis(100), vec!["Campinas", "São Paulo"]));
        Arc::new(FakeGeoApi {
            regions: vec![
                Region {
                    name: "Rio de Janeiro".to_string(),
                    code: "RJ".to_string(),
                },
                Region {
                    name: "São Paulo".to_string(),
                    code: "SP".to_string(),
                },
            ],
            cities,
        })
    }

    fn drain(app: &mut App, rx: &mut UnboundedReceiver<Action>) -> usize {
        let mut applied = 0;
        while let Ok(action) = rx.try_recv() {
            app.dispatch(action);
            applied += 1;
        }
        applied
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_loads_regions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut loader = Loader::new(fake_api(), tx);
        let mut navigator = HandoffNavigator::default();
        let mut app = App::new();

        let effects = app.dispatch(Action::Mount);
        assert!(!loader.run(effects, &mut navigator));

        let action = rx.recv().await.unwrap();
        app.dispatch(action);
        assert_eq!(app.regions.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_request_never_lands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut loader = Loader::new(fake_api(), tx);
        let mut navigator = HandoffNavigator::default();
        let mut app = App::new();

        // RJ 较慢，SP 较快；切换到 SP 后 RJ 请求被中止
        let effects = app.dispatch(Action::SelectRegion("RJ".to_string()));
        loader.run(effects, &mut navigator);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let effects = app.dispatch(Action::SelectRegion("SP".to_string()));
        loader.run(effects, &mut navigator);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(drain(&mut app, &mut rx), 1);

        let labels: Vec<&str> = app.sub_regions.options()[1..]
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Campinas", "São Paulo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_region_cancels_pending_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut loader = Loader::new(fake_api(), tx);
        let mut navigator = HandoffNavigator::default();
        let mut app = App::new();

        let effects = app.dispatch(Action::SelectRegion("RJ".to_string()));
        loader.run(effects, &mut navigator);
        let effects = app.dispatch(Action::SelectRegion(String::new()));
        assert_eq!(effects, vec![Effect::CancelSubRegions]);
        loader.run(effects, &mut navigator);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(drain(&mut app, &mut rx), 0);
        assert_eq!(app.sub_regions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_sub_region_load_surfaces_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut loader = Loader::new(fake_api(), tx);
        let mut navigator = HandoffNavigator::default();
        let mut app = App::new();

        let effects = app.dispatch(Action::SelectRegion("XX".to_string()));
        loader.run(effects, &mut navigator);
        let action = rx.recv().await.unwrap();
        app.dispatch(action);

        assert!(matches!(
            app.sub_regions.state,
            crate::models::LoadState::Failed(_)
        ));
        assert!(app.message.as_deref().unwrap_or("").contains("XX"));
    }

    #[tokio::test]
    async fn test_navigate_hands_off_and_leaves() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut loader = Loader::new(fake_api(), tx);
        let mut navigator = HandoffNavigator::default();
        let route = Route::Points {
            uf: "SP".to_string(),
            city: "São Paulo".to_string(),
        };

        assert!(loader.run(vec![Effect::Navigate(route.clone())], &mut navigator));
        assert_eq!(navigator.take(), Some(route));
        assert!(loader.run(vec![Effect::Quit], &mut navigator));
    }
}
