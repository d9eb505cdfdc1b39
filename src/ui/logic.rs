//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use super::actions::{Action, Effect};
use super::state::{Alert, App, AppMode, Dropdown, Field, Phase, Picker};
use crate::models::{LoadState, Region, SubRegion};
use crate::navigation::Route;

impl App {
    /// 核心逻辑分发，返回需要运行时执行的副作用
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        // 已提交后界面即将被替换，不再响应
        if self.phase() == Phase::Submitted {
            return Vec::new();
        }

        match action {
            Action::Mount => return self.mount(),
            Action::Quit => return vec![Effect::Quit],

            Action::FocusNext => {
                if self.mode == AppMode::Normal {
                    self.focus = self.focus.next();
                }
            }
            Action::FocusPrev => {
                if self.mode == AppMode::Normal {
                    self.focus = self.focus.prev();
                }
            }
            Action::MoveUp => self.move_cursor_up(),
            Action::MoveDown => self.move_cursor_down(),

            Action::Submit => match &self.mode {
                AppMode::Normal => match self.focus {
                    Field::Region => self.open_picker(Dropdown::Region),
                    Field::SubRegion => self.open_picker(Dropdown::SubRegion),
                    Field::Submit => return self.submit(),
                },
                AppMode::Picking(dropdown) => {
                    let dropdown = *dropdown;
                    return self.choose_highlighted(dropdown);
                }
                AppMode::Alert(_) => self.cancel(),
            },
            Action::Cancel => self.cancel(),

            Action::Input(c) => {
                if matches!(self.mode, AppMode::Picking(_)) {
                    self.picker.filter.push(c);
                    self.reset_cursor();
                }
            }
            Action::DeleteChar => {
                if matches!(self.mode, AppMode::Picking(_)) {
                    self.picker.filter.pop();
                    self.reset_cursor();
                }
            }
            Action::Retry => return self.retry(),

            Action::SelectRegion(code) => return self.select_region(code),
            Action::SelectSubRegion(name) => self.select_sub_region(name),

            Action::RegionsLoaded(result) => self.apply_regions(result),
            Action::SubRegionsLoaded {
                generation,
                region_code,
                result,
            } => self.apply_sub_regions(generation, region_code, result),
        }
        Vec::new()
    }

    // ============ 加载相关 ============

    /// 界面激活：加载州列表一次
    fn mount(&mut self) -> Vec<Effect> {
        self.regions.state = LoadState::Loading;
        vec![Effect::LoadRegions]
    }

    fn apply_regions(&mut self, result: Result<Vec<Region>, String>) {
        match result {
            Ok(regions) => {
                tracing::info!(count = regions.len(), "regions loaded");
                self.regions.replace(regions);
                self.message = None;
            }
            Err(e) => {
                self.message = Some(format!("Falha ao carregar estados: {}", e));
                self.regions.state = LoadState::Failed(e);
            }
        }
    }

    fn apply_sub_regions(
        &mut self,
        generation: u64,
        region_code: String,
        result: Result<Vec<SubRegion>, String>,
    ) {
        if generation != self.sub_region_generation {
            tracing::debug!(
                generation,
                current = self.sub_region_generation,
                %region_code,
                "discarding stale sub-region result"
            );
            return;
        }

        match result {
            Ok(sub_regions) => {
                tracing::info!(count = sub_regions.len(), %region_code, "sub-regions loaded");
                self.sub_regions.replace(sub_regions);
                self.message = None;
            }
            Err(e) => {
                self.message = Some(format!("Falha ao carregar cidades de {}: {}", region_code, e));
                self.sub_regions.state = LoadState::Failed(e);
            }
        }
    }

    /// 重新发起失败的加载
    fn retry(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if matches!(self.regions.state, LoadState::Failed(_)) {
            effects.extend(self.mount());
        }
        if matches!(self.sub_regions.state, LoadState::Failed(_))
            && !self.selected_region_code.is_empty()
        {
            effects.push(self.request_sub_regions());
        }
        if !effects.is_empty() {
            self.message = None;
        }
        effects
    }

    fn request_sub_regions(&mut self) -> Effect {
        self.sub_region_generation += 1;
        self.sub_regions.reset();
        self.sub_regions.state = LoadState::Loading;
        Effect::LoadSubRegions {
            generation: self.sub_region_generation,
            region_code: self.selected_region_code.clone(),
        }
    }

    // ============ 选择相关 ============

    /// 保存所选州；变化时替换城市列表并清除已选城市
    pub fn select_region(&mut self, code: String) -> Vec<Effect> {
        if code == self.selected_region_code {
            // 同一州：仅在上次城市加载失败时重新请求
            if !code.is_empty() && matches!(self.sub_regions.state, LoadState::Failed(_)) {
                self.message = None;
                return vec![self.request_sub_regions()];
            }
            return Vec::new();
        }

        self.selected_region_code = code;
        self.selected_sub_region_name.clear();

        if self.selected_region_code.is_empty() {
            // 空州不请求，只清空城市列表
            self.sub_region_generation += 1;
            self.sub_regions.reset();
            return vec![Effect::CancelSubRegions];
        }

        vec![self.request_sub_regions()]
    }

    pub fn select_sub_region(&mut self, name: String) {
        self.selected_sub_region_name = name;
    }

    /// 校验两个选择后导航，否则弹出提示
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.selected_region_code.is_empty() || self.selected_sub_region_name.is_empty() {
            self.mode = AppMode::Alert(Alert::selection_incomplete());
            return Vec::new();
        }

        self.submitted = true;
        vec![Effect::Navigate(Route::Points {
            uf: self.selected_region_code.clone(),
            city: self.selected_sub_region_name.clone(),
        })]
    }

    // ============ 下拉框弹窗相关 ============

    fn open_picker(&mut self, dropdown: Dropdown) {
        let current = self.selected_value(dropdown);
        let cursor = self.options_for(dropdown).position_of(current);
        self.picker = Picker {
            filter: String::new(),
            cursor,
        };
        self.mode = AppMode::Picking(dropdown);
    }

    fn choose_highlighted(&mut self, dropdown: Dropdown) -> Vec<Effect> {
        let value = self
            .visible_options(dropdown)
            .get(self.picker.cursor)
            .map(|(_, option)| option.value.clone());

        self.mode = AppMode::Normal;
        self.picker = Picker::default();

        let Some(value) = value else {
            return Vec::new();
        };
        match dropdown {
            Dropdown::Region => self.dispatch(Action::SelectRegion(value)),
            Dropdown::SubRegion => self.dispatch(Action::SelectSubRegion(value)),
        }
    }

    fn move_cursor_up(&mut self) {
        if matches!(self.mode, AppMode::Picking(_)) && self.picker.cursor > 0 {
            self.picker.cursor -= 1;
        }
    }

    fn move_cursor_down(&mut self) {
        if let AppMode::Picking(dropdown) = self.mode {
            if self.picker.cursor + 1 < self.visible_options(dropdown).len() {
                self.picker.cursor += 1;
            }
        }
    }

    /// 过滤词变化后光标落在第一个匹配项
    fn reset_cursor(&mut self) {
        if let AppMode::Picking(dropdown) = self.mode {
            let visible = self.visible_options(dropdown).len();
            self.picker.cursor = if self.picker.filter.is_empty() || visible < 2 { 0 } else { 1 };
        }
    }

    // ============ 通用操作 ============

    /// 关闭弹窗或提示框
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
        self.picker = Picker::default();
    }
}
