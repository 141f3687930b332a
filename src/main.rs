// main.rs — window, event loop and the menu / status UI

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

mod camera;
mod config;
mod drop_gate;
mod error;
mod i18n;
mod loader;
mod mesh;
mod orbit;
mod panorama;
mod renderer;
mod texture;

use camera::PerspectiveCamera;
use config::ViewerConfig;
use drop_gate::DropCollector;
use error::ViewerError;
use loader::PanoramaLoader;
use orbit::OrbitSettings;
use panorama::ViewerState;
use renderer::Renderer;
use texture::TargetSize;

use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ViewerError> {
    let config = ViewerConfig::load();
    log::debug!("{config:?}");

    let mut current_lang = config.lang.clone();
    i18n::init(current_lang.clone());

    let event_loop = EventLoop::new();
    let title = config
        .window
        .title
        .clone()
        .unwrap_or_else(|| i18n::tr("app.title"));
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?,
    );

    let sphere = mesh::build_sphere(config.sphere.radius, config.sphere.divisions);
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &sphere))?;
    let camera = PerspectiveCamera::from(&config.camera);

    let mut state = ViewerState::new(OrbitSettings::from(&config.orbit));
    let mut loader = PanoramaLoader::new(TargetSize::from(&config.texture));
    let mut drops = DropCollector::default();

    let mut cursor = PhysicalPosition::new(0.0f64, 0.0f64);
    let mut dragging = false;

    log::info!(
        "Viewer ready: sphere r={} ({} divisions), fov {}°",
        config.sphere.radius,
        config.sphere.divisions,
        camera.fov_deg
    );

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                // drag-and-drop goes straight to the gate, never to egui
                match event {
                    WindowEvent::HoveredFile(path) => {
                        drops.hover(path);
                        return;
                    }
                    WindowEvent::HoveredFileCancelled => {
                        drops.cancel_hover();
                        return;
                    }
                    WindowEvent::DroppedFile(path) => {
                        drops.drop_file(path);
                        return;
                    }
                    _ => {}
                }

                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::O) => {
                                    if let Some(path) = pick_image() {
                                        loader.request(path);
                                    }
                                }
                                Some(VirtualKeyCode::F11) => {
                                    toggle_fullscreen(&window, &mut state);
                                }
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        dragging = button_state == ElementState::Pressed;
                        if dragging {
                            state.orbit.pointer_down(cursor.x as f32, cursor.y as f32);
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        if dragging {
                            state.orbit.pointer_drag(position.x as f32, position.y as f32);
                        }
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                renderer.update_camera(camera.view_projection(renderer.aspect(), state.orbit.rotation()));

                let mut action = UiAction::None;
                let is_loading = loader.is_loading();
                let hovering = drops.is_hovering();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    action = draw_ui(ctx, &state, is_loading, hovering, &mut current_lang);
                });

                match action {
                    UiAction::None => {}
                    UiAction::Open(path) => loader.request(path),
                    UiAction::ResetView => state.reset_view(),
                    UiAction::ToggleFullscreen => toggle_fullscreen(&window, &mut state),
                    UiAction::SwitchLanguage => {
                        i18n::init(current_lang.clone());
                        if config.window.title.is_none() {
                            window.set_title(&i18n::tr("app.title"));
                        }
                    }
                    UiAction::Exit => *control_flow = ControlFlow::Exit,
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory; exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                // all DroppedFile events of one drop arrive in the same iteration
                if let Some(payload) = drops.take_payload() {
                    state.on_drop(&payload, &mut loader);
                }

                if let Some(event) = loader.poll() {
                    if let Some(tex) = state.on_load_event(event) {
                        renderer.set_panorama(tex);
                    }
                }

                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(&i18n::tr("file.filter.images"), &IMAGE_EXTENSIONS)
        .pick_file()
}

fn toggle_fullscreen(window: &Window, state: &mut ViewerState) {
    state.is_fullscreen = !state.is_fullscreen;
    if state.is_fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

enum UiAction {
    None,
    Open(PathBuf),
    ResetView,
    ToggleFullscreen,
    SwitchLanguage,
    Exit,
}

fn draw_ui(
    ctx: &egui::Context,
    state: &ViewerState,
    is_loading: bool,
    drop_hover: bool,
    current_lang: &mut String,
) -> UiAction {
    let mut action = UiAction::None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(i18n::tr("menu.file"), |ui| {
                if ui.button(i18n::tr("menu.open_image")).clicked() {
                    ui.close_menu();
                    if let Some(path) = pick_image() {
                        action = UiAction::Open(path);
                    }
                }
                if ui.button(i18n::tr("menu.exit")).clicked() {
                    action = UiAction::Exit;
                }
            });

            ui.menu_button(i18n::tr("menu.view"), |ui| {
                if ui.button(i18n::tr("view.reset")).clicked() {
                    action = UiAction::ResetView;
                    ui.close_menu();
                }
                let fullscreen_label = if state.is_fullscreen {
                    i18n::tr("view.fullscreen.exit")
                } else {
                    i18n::tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    action = UiAction::ToggleFullscreen;
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.language"), |ui| {
                for (code, name) in i18n::LANGUAGES {
                    if ui.radio_value(current_lang, code.to_string(), name).clicked() {
                        action = UiAction::SwitchLanguage;
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if is_loading {
                ui.label(
                    egui::RichText::new(i18n::tr("status.loading_image")).color(egui::Color32::YELLOW),
                );
                ui.label("|");
            }

            match &state.current {
                Some(name) => ui.label(name.as_str()),
                None => ui.label(i18n::tr("status.no_image")),
            };
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", state.orbit.yaw()));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", state.orbit.pitch()));

            if let Some(notice) = &state.notice {
                ui.label("|");
                ui.label(
                    egui::RichText::new(i18n::tr_with(
                        "notice.load_failed",
                        &[("file", notice.file.clone()), ("reason", notice.reason.clone())],
                    ))
                    .color(egui::Color32::LIGHT_RED),
                );
            }
        });
    });

    if drop_hover {
        egui::Area::new("drop_hint")
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(i18n::tr("status.drop_hint"))
                        .size(28.0)
                        .color(egui::Color32::WHITE),
                );
            });
    }

    action
}
