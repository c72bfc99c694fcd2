//! System tray icon and menu.
//!
//! The icon switches between an idle and a counting image; the tooltip shows
//! the time left. Menu clicks are decoded into [`TrayCommand`] values.

use crate::{
    AppError, AppResult, TrayCommand, TrayIconState,
    config::Config,
    tray_command::{AlertStep, CUSTOM_MINUTES, custom_minutes_label},
};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use tray_icon::menu::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use tray_timer_core::{PresetId, PresetItem};

/// Checkable menu entries. Their command carries the state after the click.
#[derive(Debug, Clone, Copy)]
enum Toggle {
    Looping,
    AlertStep(AlertStep),
    SystemSound,
    Fade,
    FloatingWindow,
}

impl Toggle {
    fn command(self, checked: bool) -> TrayCommand {
        match self {
            Toggle::Looping => TrayCommand::SetLooping(checked),
            Toggle::AlertStep(step) => TrayCommand::SetAlertStep(step, checked),
            Toggle::SystemSound => TrayCommand::SetSystemSound(checked),
            Toggle::Fade => TrayCommand::SetFade(checked),
            Toggle::FloatingWindow => TrayCommand::SetFloatingWindow(checked),
        }
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    state: TrayIconState,
    actions: HashMap<MenuId, TrayCommand>,
    toggles: Vec<(CheckMenuItem, Toggle)>,
}

impl TrayManager {
    /// Build the tray icon with one entry per preset and toggles reflecting
    /// `config`.
    #[track_caller]
    #[instrument(skip_all)]
    pub fn new<'a>(
        presets: impl IntoIterator<Item = (PresetId, &'a PresetItem)>,
        config: &Config,
    ) -> AppResult<Self> {
        let menu = Menu::new();
        let mut actions = HashMap::new();
        let mut toggles = Vec::new();

        let mut preset_count = 0;
        for (id, preset) in presets {
            let item = MenuItem::new(preset.label(), true, None);
            actions.insert(item.id().clone(), TrayCommand::StartPreset(id));
            menu.append(&item).map_err(|e| tray_error("preset item", e))?;
            preset_count += 1;
        }

        let custom_menu = Submenu::new("Custom countdown", true);
        for minutes in CUSTOM_MINUTES {
            let item = MenuItem::new(custom_minutes_label(minutes), true, None);
            actions.insert(item.id().clone(), TrayCommand::StartMinutes(minutes));
            custom_menu
                .append(&item)
                .map_err(|e| tray_error("custom countdown item", e))?;
        }

        let stop_item = MenuItem::new("Stop countdown", true, None);
        actions.insert(stop_item.id().clone(), TrayCommand::StopCountdown);

        let loop_item = CheckMenuItem::new("Repeat countdown", true, config.countdown.looping, None);

        let alerts_menu = Submenu::new("Alert options", true);
        for step in AlertStep::ALL {
            let item = CheckMenuItem::new(step.label(), true, step.is_enabled(&config.alerts), None);
            alerts_menu
                .append(&item)
                .map_err(|e| tray_error("alert option", e))?;
            toggles.push((item, Toggle::AlertStep(step)));
        }

        let sound_menu = Submenu::new("Sound", true);
        let system_sound_item =
            CheckMenuItem::new("Use system sound", true, config.audio.use_system_sound, None);
        let fade_item = CheckMenuItem::new("Fade in and out", true, config.audio.enable_fade, None);
        sound_menu
            .append_items(&[&system_sound_item, &fade_item])
            .map_err(|e| tray_error("sound options", e))?;

        let floating_item =
            CheckMenuItem::new("Show floating timer", true, config.window.visible, None);
        let clipboard_item = MenuItem::new("Use clipboard text as message", true, None);
        let preview_item = MenuItem::new("Preview alert", true, None);
        let clear_item = MenuItem::new("Clear saved messages", true, None);
        let settings_item = MenuItem::new("Open settings folder", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        actions.insert(clipboard_item.id().clone(), TrayCommand::UseClipboardText);
        actions.insert(preview_item.id().clone(), TrayCommand::PreviewAlert);
        actions.insert(clear_item.id().clone(), TrayCommand::ClearHistory);
        actions.insert(settings_item.id().clone(), TrayCommand::OpenSettingsFolder);
        actions.insert(exit_item.id().clone(), TrayCommand::Exit);

        menu.append_items(&[
            &custom_menu,
            &PredefinedMenuItem::separator(),
            &stop_item,
            &loop_item,
            &PredefinedMenuItem::separator(),
            &alerts_menu,
            &sound_menu,
            &floating_item,
            &PredefinedMenuItem::separator(),
            &clipboard_item,
            &preview_item,
            &clear_item,
            &PredefinedMenuItem::separator(),
            &settings_item,
            &exit_item,
        ])
        .map_err(|e| tray_error("menu items", e))?;

        toggles.push((loop_item, Toggle::Looping));
        toggles.push((system_sound_item, Toggle::SystemSound));
        toggles.push((fade_item, Toggle::Fade));
        toggles.push((floating_item, Toggle::FloatingWindow));

        let state = TrayIconState::Idle;
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(presets = preset_count, "System tray icon initialized");

        Ok(Self {
            tray_icon,
            state,
            actions,
            toggles,
        })
    }

    /// Decode a menu click. Unknown ids (separators, submenus) yield `None`.
    pub fn command_for(&self, id: &MenuId) -> Option<TrayCommand> {
        if let Some(command) = self.actions.get(id) {
            return Some(*command);
        }

        self.toggles
            .iter()
            .find(|(item, _)| item.id() == id)
            .map(|(item, toggle)| toggle.command(item.is_checked()))
    }

    /// Uncheck "Show floating timer" after the window was closed directly.
    pub fn set_floating_window_checked(&self, checked: bool) {
        for (item, toggle) in &self.toggles {
            if matches!(toggle, Toggle::FloatingWindow) {
                item.set_checked(checked);
            }
        }
    }

    /// Update the icon and tooltip. The icon is only reloaded when the
    /// state kind changes.
    #[track_caller]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        if !state.same_icon(self.state) {
            self.tray_icon
                .set_icon(Some(Self::load_icon(state)?))
                .map_err(|e| AppError::TrayError {
                    reason: format!("Failed to update icon: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            debug!(?state, "Tray icon changed");
        }

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.state = state;
        Ok(())
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Idle => include_bytes!("../resources/icons/idle.png"),
            TrayIconState::CountingDown { .. } => include_bytes!("../resources/icons/counting.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[track_caller]
fn tray_error(what: &str, e: tray_icon::menu::Error) -> AppError {
    AppError::TrayError {
        reason: format!("Failed to add {}: {}", what, e),
        location: ErrorLocation::from(Location::caller()),
    }
}
