mod content;
mod particles;
mod quiz;
mod ui;

use bevy::prelude::*;
use content::QuestionBank;
use particles::CelebrationPlugin;
use quiz::{QuizPlugin, Screen};
use ui::UiPlugin;

pub const WINDOW_WIDTH: f32 = 1024.0;
pub const WINDOW_HEIGHT: f32 = 768.0;

fn main() {
    let bank = match QuestionBank::load_embedded() {
        Ok(bank) => bank,
        Err(err) => {
            eprintln!("cannot start: {err}");
            std::process::exit(1);
        }
    };

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.98)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(bank)
        .init_state::<Screen>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cloud Quest".into(),
                resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((QuizPlugin, UiPlugin, CelebrationPlugin))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}
