//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::models::{OptionList, SelectOption, REGION_PLACEHOLDER, SUB_REGION_PLACEHOLDER};

pub const ALERT_TITLE: &str = "Oops!";
pub const ALERT_MESSAGE: &str =
    "Precisamos que selecione um estado e uma cidade para continuar...";

/// 应用状态
pub struct App {
    pub regions: OptionList,
    pub sub_regions: OptionList,
    pub selected_region_code: String,
    pub selected_sub_region_name: String,
    pub focus: Field,
    pub mode: AppMode,
    pub picker: Picker,
    pub sub_region_generation: u64, // 最新一次城市请求的代号
    pub submitted: bool,
    pub message: Option<String>,
}

/// 可获得焦点的控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Region,
    SubRegion,
    Submit,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Region => Field::SubRegion,
            Field::SubRegion => Field::Submit,
            Field::Submit => Field::Region,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Region => Field::Submit,
            Field::SubRegion => Field::Region,
            Field::Submit => Field::SubRegion,
        }
    }
}

/// 下拉框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Region,
    SubRegion,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Picking(Dropdown),
    Alert(Alert),
}

/// 阻塞式提示框
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn selection_incomplete() -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: ALERT_MESSAGE.to_string(),
        }
    }
}

/// 下拉框弹窗内的过滤词与光标
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picker {
    pub filter: String,
    pub cursor: usize, // 过滤结果中的位置
}

/// 选择流程所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RegionSelected,
    SubRegionSelected,
    Submitted,
}

impl App {
    /// 创建新的应用实例
    pub fn new() -> Self {
        Self {
            regions: OptionList::new(REGION_PLACEHOLDER),
            sub_regions: OptionList::new(SUB_REGION_PLACEHOLDER),
            selected_region_code: String::new(),
            selected_sub_region_name: String::new(),
            focus: Field::Region,
            mode: AppMode::Normal,
            picker: Picker::default(),
            sub_region_generation: 0,
            submitted: false,
            message: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.submitted {
            Phase::Submitted
        } else if self.selected_region_code.is_empty() {
            Phase::Idle
        } else if self.selected_sub_region_name.is_empty() {
            Phase::RegionSelected
        } else {
            Phase::SubRegionSelected
        }
    }

    pub fn options_for(&self, dropdown: Dropdown) -> &OptionList {
        match dropdown {
            Dropdown::Region => &self.regions,
            Dropdown::SubRegion => &self.sub_regions,
        }
    }

    pub fn selected_value(&self, dropdown: Dropdown) -> &str {
        match dropdown {
            Dropdown::Region => &self.selected_region_code,
            Dropdown::SubRegion => &self.selected_sub_region_name,
        }
    }

    /// 下拉框当前显示的文字：已选项的 label，否则占位符
    pub fn display_label(&self, dropdown: Dropdown) -> &str {
        let list = self.options_for(dropdown);
        let value = self.selected_value(dropdown);
        match list.label_for(value) {
            Some(label) => label,
            None if value.is_empty() => list.placeholder().label.as_str(),
            None => value,
        }
    }

    /// 弹窗中可见的选项
    pub fn visible_options(&self, dropdown: Dropdown) -> Vec<(usize, &SelectOption)> {
        self.options_for(dropdown).filtered(&self.picker.filter)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
