//! Action / Effect 定义 (Intent)
//!
//! 用户交互与异步结果都转化为 Action；状态变化需要的副作用以 Effect 返回

use crate::models::{Region, SubRegion};
use crate::navigation::Route;

/// 用户操作与加载结果
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // 生命周期
    Mount,
    Quit,

    // 焦点/列表导航
    FocusNext,
    FocusPrev,
    MoveUp,
    MoveDown,

    // 表单/通用交互
    Submit,      // Enter
    Cancel,      // Esc
    Input(char), // 过滤字符
    DeleteChar,  // Backspace
    Retry,

    // 两个下拉框的赋值
    SelectRegion(String),
    SelectSubRegion(String),

    // 异步加载结果
    RegionsLoaded(Result<Vec<Region>, String>),
    SubRegionsLoaded {
        generation: u64,
        region_code: String,
        result: Result<Vec<SubRegion>, String>,
    },
}

/// 由运行时执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadRegions,
    LoadSubRegions { generation: u64, region_code: String },
    CancelSubRegions,
    Navigate(Route),
    Quit,
}
