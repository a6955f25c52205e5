use bevy::prelude::*;

mod app;
mod config;
mod constants;
mod effect;
mod engine;
mod flash;
mod noise_table;
mod particles;
mod shake;
mod smoke;
mod surface;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Blast FX".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(app::BlastPlugin)
        .run();
}
