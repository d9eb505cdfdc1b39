//! 导航协作者
//!
//! 本程序只负责调用导航，目标界面的行为由外部定义

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// 目标界面及其参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen")]
pub enum Route {
    Points { uf: String, city: String },
}

impl Route {
    pub fn screen(&self) -> &'static str {
        match self {
            Route::Points { .. } => "Points",
        }
    }
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// 记录路由，待终端恢复后再交给下游程序
#[derive(Debug, Default)]
pub struct HandoffNavigator {
    route: Option<Route>,
}

impl HandoffNavigator {
    pub fn take(&mut self) -> Option<Route> {
        self.route.take()
    }
}

impl Navigator for HandoffNavigator {
    fn navigate(&mut self, route: Route) {
        tracing::info!(screen = route.screen(), ?route, "navigating");
        self.route = Some(route);
    }
}

/// 以 TOML 文档写出路由
pub fn write_route(route: &Route, out: &mut impl Write) -> Result<()> {
    let document = toml::to_string(route)?;
    out.write_all(document.as_bytes())?;
    out.flush()?;
    Ok(())
}
