// Bevy front-end: trigger input, canvas upload, overlays and camera shake
use bevy::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{PrimaryWindow, WindowResized, WindowScaleFactorChanged};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::BlastConfig;
use crate::constants::*;
use crate::effect::EffectSignal;
use crate::engine::BlastEngine;
use crate::flash::FlashFade;
use crate::surface::{PixelCanvas, Surface};

const FALLBACK_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

pub struct BlastPlugin;

impl Plugin for BlastPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BlastConfig>()
            .init_resource::<BlastEngine>()
            .insert_resource(ClearColor(Color::from(BACKGROUND_COLOR)))
            .add_event::<DetonateEvent>()
            .add_systems(Startup, setup_blast_scene)
            .add_systems(Update, (
                detonate_input_system,
                fire_blast_system,
                resize_canvas_system,
                render_blast_frame_system,
                animate_flash_overlay_system,
            ).chain());
    }
}

impl FromWorld for BlastEngine {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<BlastConfig>().cloned().unwrap_or_default();
        BlastEngine::new(config, StdRng::from_entropy())
    }
}

/// User asked for a blast (button click or Space)
#[derive(Event)]
pub struct DetonateEvent;

/// CPU canvas and the GPU image it is uploaded into every frame
#[derive(Resource)]
pub struct BlastCanvas {
    pub canvas: PixelCanvas,
    pub image: Handle<Image>,
}

/// Sprite showing the canvas; visible only while an effect is active
#[derive(Component)]
pub struct BlastCanvasSprite;

#[derive(Component)]
pub struct DetonateButton;

/// Full-screen UI container moved by the screen shake
#[derive(Component)]
pub struct ShakeRoot;

#[derive(Component)]
pub struct FinalMessage;

/// Full-screen white UI layer fading out after a blast
#[derive(Component)]
pub struct FlashOverlay {
    pub spawned_at: f64,
    pub fade: FlashFade,
}

#[inline]
fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

fn canvas_image(canvas: &PixelCanvas) -> Image {
    let (width, height) = canvas.physical_size();
    Image::new_fill(
        Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

pub fn setup_blast_scene(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (viewport, scale) = match windows.single() {
        Ok(window) => (Vec2::new(window.width(), window.height()), window.scale_factor()),
        Err(_) => {
            warn!("No primary window found, using a {:?} canvas", FALLBACK_VIEWPORT);
            (FALLBACK_VIEWPORT, 1.0)
        }
    };

    let canvas = PixelCanvas::new(viewport, scale);
    let image = images.add(canvas_image(&canvas));
    info!("🖼️ Blast canvas {:?} logical, {:?} physical", viewport, canvas.physical_size());

    commands.spawn(Camera2d);

    commands.spawn((
        Sprite {
            image: image.clone(),
            custom_size: Some(viewport),
            ..default()
        },
        Transform::default(),
        Visibility::Hidden,
        BlastCanvasSprite,
        Name::new("BlastCanvas"),
    ));
    commands.insert_resource(BlastCanvas { canvas, image });

    let root = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            ShakeRoot,
            Name::new("ShakeRoot"),
        ))
        .id();

    // Trigger button, bottom centre
    let button = commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(40.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-90.0)),
                width: Val::Px(180.0),
                height: Val::Px(56.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.7, 0.12, 0.05)),
            BorderRadius::all(Val::Px(8.0)),
            DetonateButton,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(DETONATE_BUTTON_LABEL),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        })
        .id();

    // Final message, hidden until the reveal signal
    let message = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Visibility::Hidden,
            FinalMessage,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(FINAL_MESSAGE_TEXT),
                TextFont {
                    font_size: FINAL_MESSAGE_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        })
        .id();

    commands.entity(root).add_children(&[button, message]);
}

pub fn detonate_input_system(
    buttons: Query<&Interaction, (Changed<Interaction>, With<DetonateButton>)>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut events: EventWriter<DetonateEvent>,
) {
    let clicked = buttons.iter().any(|interaction| *interaction == Interaction::Pressed);
    if clicked || keyboard.just_pressed(KeyCode::Space) {
        events.write(DetonateEvent);
    }
}

/// Start an episode and raise the flash overlay plus the active marker
pub fn fire_blast_system(
    mut commands: Commands,
    mut events: EventReader<DetonateEvent>,
    mut engine: ResMut<BlastEngine>,
    canvas: Res<BlastCanvas>,
    time: Res<Time>,
    mut canvas_sprites: Query<&mut Visibility, With<BlastCanvasSprite>>,
    roots: Query<Entity, With<ShakeRoot>>,
) {
    if events.read().count() == 0 {
        return;
    }

    let now = now_ms(&time);
    if !engine.fire(now, canvas.canvas.size()) {
        return;
    }

    let overlay = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(Color::WHITE),
            GlobalZIndex(FLASH_OVERLAY_Z_INDEX),
            FlashOverlay {
                spawned_at: now,
                fade: FlashFade::default(),
            },
        ))
        .id();
    if let Ok(root) = roots.single() {
        commands.entity(root).add_child(overlay);
    }

    for mut visibility in canvas_sprites.iter_mut() {
        *visibility = Visibility::Visible;
    }
}

/// Reallocate the canvas to follow the window size and scale factor
pub fn resize_canvas_system(
    mut resized: EventReader<WindowResized>,
    mut rescaled: EventReader<WindowScaleFactorChanged>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut canvas: ResMut<BlastCanvas>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<&mut Sprite, With<BlastCanvasSprite>>,
) {
    // Drain both readers every frame
    let changes = resized.read().count() + rescaled.read().count();
    if changes == 0 {
        return;
    }
    let Ok(window) = windows.single() else {
        warn!("Window resized but no primary window is available");
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    canvas.canvas.resize(viewport, window.scale_factor());
    if let Some(image) = images.get_mut(&canvas.image) {
        *image = canvas_image(&canvas.canvas);
    }
    for mut sprite in sprites.iter_mut() {
        sprite.custom_size = Some(viewport);
    }
    info!("🖼️ Blast canvas resized to {:?} ({:?} physical)", viewport, canvas.canvas.physical_size());
}

/// The always-on frame loop: tick the engine, upload pixels, apply side effects
pub fn render_blast_frame_system(
    time: Res<Time>,
    mut engine: ResMut<BlastEngine>,
    mut blast_canvas: ResMut<BlastCanvas>,
    mut images: ResMut<Assets<Image>>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
    mut canvas_sprites: Query<&mut Visibility, With<BlastCanvasSprite>>,
    mut messages: Query<&mut Visibility, (With<FinalMessage>, Without<BlastCanvasSprite>)>,
    mut ui_roots: Query<&mut Node, With<ShakeRoot>>,
) {
    let now = now_ms(&time);
    let BlastCanvas { canvas, image } = &mut *blast_canvas;

    let report = engine.tick(now, canvas);

    // Move the camera opposite to the offset so the picture moves by it (canvas y points down)
    for mut transform in cameras.iter_mut() {
        transform.translation.x = -report.shake_offset.x;
        transform.translation.y = report.shake_offset.y;
    }
    // UI is laid out in screen space, so it is moved separately
    let (left, top) = (Val::Px(report.shake_offset.x), Val::Px(report.shake_offset.y));
    for mut node in ui_roots.iter_mut() {
        if node.left != left || node.top != top {
            node.left = left;
            node.top = top;
        }
    }

    for signal in &report.signals {
        match signal {
            EffectSignal::RevealMessage => {
                for mut visibility in messages.iter_mut() {
                    *visibility = Visibility::Visible;
                }
            }
            EffectSignal::Ended => {
                for mut visibility in canvas_sprites.iter_mut() {
                    *visibility = Visibility::Hidden;
                }
            }
        }
    }

    let (width, height) = canvas.physical_size();
    if width == 0 || height == 0 {
        return;
    }
    let Some(gpu_image) = images.get_mut(&*image) else {
        warn!("Blast canvas image is missing");
        return;
    };
    let Some(data) = gpu_image.data.as_mut() else {
        return;
    };
    if !canvas.write_rgba8(data) {
        warn!("Blast canvas and image sizes disagree, skipping upload");
    }
}

pub fn animate_flash_overlay_system(
    mut commands: Commands,
    time: Res<Time>,
    mut overlays: Query<(Entity, &FlashOverlay, &mut BackgroundColor)>,
) {
    let now = now_ms(&time);
    for (entity, overlay, mut background) in overlays.iter_mut() {
        match overlay.fade.opacity((now - overlay.spawned_at) as f32) {
            Some(alpha) => background.0 = Color::WHITE.with_alpha(alpha),
            None => commands.entity(entity).despawn(),
        }
    }
}
