use chrono::{DateTime, Local};
use serde::Deserialize;

pub const REGION_PLACEHOLDER: &str = "Selecione um estado";
pub const SUB_REGION_PLACEHOLDER: &str = "Selecione uma cidade";

/// 一级行政区（州），IBGE 返回 `{ "sigla": "SP", "nome": "São Paulo", ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Region {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "sigla")]
    pub code: String,
}

/// 二级行政区（城市），IBGE 返回 `{ "nome": "Campinas", ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubRegion {
    #[serde(rename = "nome")]
    pub name: String,
}

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<Region> for SelectOption {
    fn from(region: Region) -> Self {
        Self::new(region.name, region.code)
    }
}

impl From<SubRegion> for SelectOption {
    // 城市没有稳定代码，label 与 value 相同
    fn from(sub_region: SubRegion) -> Self {
        Self::new(sub_region.name.clone(), sub_region.name)
    }
}

/// 列表加载状态
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(DateTime<Local>),
    Failed(String),
}

/// 一个下拉框的全部选项：首项永远是占位符
#[derive(Debug, Clone)]
pub struct OptionList {
    options: Vec<SelectOption>,
    pub state: LoadState,
}

impl OptionList {
    pub fn new(placeholder: &str) -> Self {
        Self {
            options: vec![SelectOption::new(placeholder, "")],
            state: LoadState::Idle,
        }
    }

    pub fn placeholder(&self) -> &SelectOption {
        &self.options[0]
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// 用新结果整体替换（不合并），保持服务端顺序
    pub fn replace<T: Into<SelectOption>>(&mut self, items: Vec<T>) {
        self.options.truncate(1);
        self.options.extend(items.into_iter().map(Into::into));
        self.state = LoadState::Loaded(Local::now());
    }

    /// 清空为仅含占位符
    pub fn reset(&mut self) {
        self.options.truncate(1);
        self.state = LoadState::Idle;
    }

    pub fn label_for(&self, value: &str) -> Option<&str> {
        if value.is_empty() {
            return None;
        }
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    pub fn position_of(&self, value: &str) -> usize {
        self.options
            .iter()
            .position(|o| o.value == value)
            .unwrap_or(0)
    }

    /// 按过滤词筛选，返回 (原始下标, 选项)。占位符始终保留
    pub fn filtered(&self, filter: &str) -> Vec<(usize, &SelectOption)> {
        let needle = fold(filter);
        self.options()
            .iter()
            .enumerate()
            .filter(|(i, o)| *i == 0 || needle.is_empty() || fold(&o.label).contains(&needle))
            .collect()
    }
}

/// 去掉大小写与葡语重音，用于模糊匹配
pub fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
