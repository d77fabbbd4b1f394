use bevy::prelude::*;
use bevy_egui::{
    egui::{self, Align2, Color32, FontId, Id, LayerId, Order, Pos2, RichText, Stroke},
    EguiContexts, EguiPlugin,
};
use rand::Rng;

use crate::content::{Difficulty, QuestionBank};
use crate::particles::ParticleSystem;
use crate::quiz::{lobby_code, GameRng, Lobby, Screen, Session};
use crate::{WINDOW_HEIGHT, WINDOW_WIDTH};

const ACCENT: Color32 = Color32::from_rgb(255, 153, 0);
const INK: Color32 = Color32::BLACK;
const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

const CREDIT_LINES: [&str; 6] = [
    "Developed by the Cloud Quest team",
    "Question bank: the cloud practitioner community",
    "",
    "Built with bevy and egui",
    "",
    "(c) 2025 Cloud Quest",
];

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<Backdrop>()
            .add_systems(Startup, seed_backdrop)
            .add_systems(Update, backdrop_ui)
            .add_systems(Update, menu_ui.run_if(in_state(Screen::Menu)))
            .add_systems(Update, mode_select_ui.run_if(in_state(Screen::ModeSelect)))
            .add_systems(
                Update,
                difficulty_ui.run_if(in_state(Screen::DifficultySelect)),
            )
            .add_systems(Update, waiting_ui.run_if(in_state(Screen::Waiting)))
            .add_systems(Update, playing_ui.run_if(in_state(Screen::Playing)))
            .add_systems(Update, result_ui.run_if(in_state(Screen::Result)))
            .add_systems(Update, credits_ui.run_if(in_state(Screen::Credits)));
    }
}

/// Decorative cloud blobs behind every screen, rolled once at startup.
#[derive(Resource, Default)]
struct Backdrop {
    clouds: Vec<Cloud>,
}

struct Cloud {
    x: f32,
    y: f32,
    size: f32,
}

fn seed_backdrop(mut backdrop: ResMut<Backdrop>, mut rng: ResMut<GameRng>) {
    backdrop.clouds = (0..15)
        .map(|_| Cloud {
            x: rng.0.gen_range(0.0..WINDOW_WIDTH),
            y: rng.0.gen_range(0.0..WINDOW_HEIGHT),
            size: rng.0.gen_range(50.0..=150.0),
        })
        .collect();
}

fn backdrop_ui(mut contexts: EguiContexts, backdrop: Res<Backdrop>) {
    let painter = contexts
        .ctx_mut()
        .layer_painter(LayerId::new(Order::Background, Id::new("backdrop")));
    let fill = Color32::from_rgba_unmultiplied(255, 255, 255, 128);
    for cloud in &backdrop.clouds {
        let center = Pos2::new(cloud.x, cloud.y);
        painter.circle_filled(center, cloud.size * 0.25, fill);
        painter.circle_filled(
            Pos2::new(center.x - cloud.size * 0.28, center.y + cloud.size * 0.05),
            cloud.size * 0.18,
            fill,
        );
        painter.circle_filled(
            Pos2::new(center.x + cloud.size * 0.28, center.y + cloud.size * 0.05),
            cloud.size * 0.18,
            fill,
        );
    }
}

fn screen_title(ctx: &egui::Context, text: &str) {
    egui::Area::new(Id::new("screen_title"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 120.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new(text)
                    .font(FontId::proportional(48.0))
                    .strong()
                    .color(INK),
            );
        });
}

fn menu_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add_sized(
        [300.0, 60.0],
        egui::Button::new(
            RichText::new(label)
                .font(FontId::proportional(24.0))
                .color(INK),
        )
        .fill(ACCENT)
        .stroke(Stroke::new(2.0, INK))
        .rounding(10.0),
    )
    .clicked()
}

fn button_column(id: &'static str) -> egui::Area {
    egui::Area::new(Id::new(id)).anchor(Align2::CENTER_TOP, egui::vec2(0.0, 300.0))
}

fn menu_ui(
    mut contexts: EguiContexts,
    mut next_screen: ResMut<NextState<Screen>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Cloud Quest");
    button_column("menu_buttons").show(ctx, |ui| {
        ui.spacing_mut().item_spacing.y = 20.0;
        if menu_button(ui, "Start Game") {
            next_screen.set(Screen::ModeSelect);
        }
        if menu_button(ui, "Credits") {
            next_screen.set(Screen::Credits);
        }
        if menu_button(ui, "Quit") {
            ev_exit.send(AppExit::Success);
        }
    });
}

fn mode_select_ui(
    mut contexts: EguiContexts,
    mut lobby: ResMut<Lobby>,
    mut rng: ResMut<GameRng>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Select Game Mode");
    button_column("mode_buttons").show(ctx, |ui| {
        ui.spacing_mut().item_spacing.y = 20.0;
        if menu_button(ui, "Single Player") {
            lobby.multiplayer = false;
            next_screen.set(Screen::DifficultySelect);
        }
        if menu_button(ui, "Multiplayer") {
            lobby.multiplayer = true;
            lobby.code = lobby_code(&mut rng.0);
            next_screen.set(Screen::DifficultySelect);
        }
        if menu_button(ui, "Back") {
            next_screen.set(Screen::Menu);
        }
    });
}

fn difficulty_ui(
    mut contexts: EguiContexts,
    bank: Res<QuestionBank>,
    lobby: Res<Lobby>,
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut session: ResMut<Session>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Select Difficulty");
    button_column("difficulty_buttons").show(ctx, |ui| {
        ui.spacing_mut().item_spacing.y = 20.0;
        for difficulty in Difficulty::ALL {
            if menu_button(ui, difficulty.label()) {
                *session = Session::start(
                    difficulty,
                    &bank,
                    lobby.multiplayer,
                    time.elapsed(),
                    &mut rng.0,
                );
                info!(
                    "starting {} round ({})",
                    difficulty.label(),
                    if lobby.multiplayer {
                        "multiplayer"
                    } else {
                        "single player"
                    }
                );
                next_screen.set(if lobby.multiplayer {
                    Screen::Waiting
                } else {
                    Screen::Playing
                });
            }
        }
        if menu_button(ui, "Back") {
            next_screen.set(Screen::ModeSelect);
        }
    });
}

fn waiting_ui(mut contexts: EguiContexts, lobby: Res<Lobby>, time: Res<Time>) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Waiting for Opponent");
    egui::Area::new(Id::new("waiting_status"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 250.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("Game Code: {}", lobby.code))
                        .font(FontId::proportional(36.0))
                        .color(INK),
                );
                ui.add_space(60.0);
                let dots = ".".repeat((time.elapsed_seconds() * 2.0) as usize % 4);
                ui.label(
                    RichText::new(format!("Waiting{dots}"))
                        .font(FontId::proportional(24.0))
                        .color(INK),
                );
            });
        });
}

fn playing_ui(
    mut contexts: EguiContexts,
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut session: ResMut<Session>,
) {
    // Nothing to render on the frame where the result transition is pending.
    let Some(question) = session.question().cloned() else {
        return;
    };
    let ctx = contexts.ctx_mut();

    egui::Area::new(Id::new("playing_header"))
        .anchor(Align2::LEFT_TOP, egui::vec2(50.0, 50.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new(format!(
                    "Question {}/{} - {}",
                    session.question_number(),
                    session.question_count(),
                    session.difficulty.label()
                ))
                .font(FontId::proportional(36.0))
                .color(INK),
            );
            ui.label(
                RichText::new(format!("Your Score: {}", session.score))
                    .font(FontId::proportional(24.0))
                    .color(INK),
            );
        });

    if session.multiplayer {
        egui::Area::new(Id::new("opponent_score"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-50.0, 100.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Opponent Score: {}", session.opponent_score))
                        .font(FontId::proportional(24.0))
                        .color(INK),
                );
            });
    }

    egui::Area::new(Id::new("question_text"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 200.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new(question.text.as_str())
                    .font(FontId::proportional(28.0))
                    .color(INK),
            );
        });

    egui::Area::new(Id::new("options"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 300.0))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 20.0;
            for (i, option) in question.options.iter().enumerate() {
                let selected = session.selected_answer() == Some(i);
                let fill = if selected { ACCENT } else { Color32::WHITE };
                let clicked = ui
                    .add_sized(
                        [600.0, 60.0],
                        egui::Button::new(
                            RichText::new(format!("{}. {}", OPTION_LETTERS[i], option))
                                .font(FontId::proportional(24.0))
                                .color(INK),
                        )
                        .fill(fill)
                        .stroke(Stroke::new(2.0, INK))
                        .rounding(10.0),
                    )
                    .clicked();
                if clicked {
                    session.answer(i, time.elapsed(), &mut rng.0);
                }
            }
        });
}

fn result_ui(
    mut contexts: EguiContexts,
    session: Res<Session>,
    fx: Res<ParticleSystem>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Game Results");

    egui::Area::new(Id::new("result_summary"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 250.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(session.outcome().message())
                        .font(FontId::proportional(36.0))
                        .color(INK),
                );
                ui.add_space(40.0);
                ui.label(
                    RichText::new(format!("Your Score: {}", session.score))
                        .font(FontId::proportional(24.0))
                        .color(INK),
                );
                if session.multiplayer {
                    ui.label(
                        RichText::new(format!("Opponent Score: {}", session.opponent_score))
                            .font(FontId::proportional(24.0))
                            .color(INK),
                    );
                }
            });
        });

    egui::Area::new(Id::new("result_buttons"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 500.0))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 20.0;
            if menu_button(ui, "Play Again") {
                next_screen.set(Screen::DifficultySelect);
            }
            if menu_button(ui, "Main Menu") {
                next_screen.set(Screen::Menu);
            }
        });

    fx.draw(&ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("celebration"))));
}

fn credits_ui(mut contexts: EguiContexts, mut next_screen: ResMut<NextState<Screen>>) {
    let ctx = contexts.ctx_mut();
    screen_title(ctx, "Credits");

    egui::Area::new(Id::new("credit_lines"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 250.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                for line in CREDIT_LINES {
                    ui.label(
                        RichText::new(line)
                            .font(FontId::proportional(24.0))
                            .color(INK),
                    );
                }
            });
        });

    egui::Area::new(Id::new("credits_back"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 580.0))
        .show(ctx, |ui| {
            if menu_button(ui, "Back") {
                next_screen.set(Screen::Menu);
            }
        });
}
