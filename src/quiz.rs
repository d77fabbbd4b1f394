use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::content::{Difficulty, Question, QuestionBank};
use crate::particles::ParticleSystem;
use crate::{WINDOW_HEIGHT, WINDOW_WIDTH};

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Menu,
    ModeSelect,
    DifficultySelect,
    Waiting,
    Playing,
    Result,
    Credits,
}

/// Points for a correct answer before the time bonus.
pub const BASE_AWARD: u32 = 100;
/// The time bonus starts here and loses one point per elapsed second.
pub const MAX_TIME_BONUS: u64 = 50;
/// Chance the simulated opponent answers a question correctly.
pub const OPPONENT_HIT_RATE: f64 = 0.7;
/// How long the chosen option stays highlighted before the next question.
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);
/// Fixed lobby countdown before a multiplayer round starts.
pub const WAITING_PERIOD: f32 = 3.0;

#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Mode choice made on the mode-select screen, read when a session starts.
/// The code is display-only; there is no real lobby behind it.
#[derive(Resource, Default)]
pub struct Lobby {
    pub multiplayer: bool,
    pub code: String,
}

pub fn lobby_code(rng: &mut impl Rng) -> String {
    (0..6).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Win => "Congratulations! You Won!",
            Outcome::Loss => "You Lost. Try Again!",
            Outcome::Tie => "It's a Tie!",
        }
    }
}

/// One quiz round. Owned by the controller as a resource and mutated only
/// through the methods below; `now` is a monotonic-clock offset supplied by
/// the caller so every transition is deterministic under test.
#[derive(Resource, Default)]
pub struct Session {
    pub difficulty: Difficulty,
    questions: Vec<Question>,
    current_question: usize,
    pub score: u32,
    pub opponent_score: u32,
    pub multiplayer: bool,
    selected_answer: Option<usize>,
    question_started: Duration,
    reveal_until: Option<Duration>,
}

impl Session {
    pub fn start(
        difficulty: Difficulty,
        bank: &QuestionBank,
        multiplayer: bool,
        now: Duration,
        rng: &mut impl Rng,
    ) -> Self {
        let mut questions = bank.tier(difficulty).to_vec();
        questions.shuffle(rng);
        Self {
            difficulty,
            questions,
            current_question: 0,
            score: 0,
            opponent_score: 0,
            multiplayer,
            selected_answer: None,
            question_started: now,
            reveal_until: None,
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    pub fn question_number(&self) -> usize {
        self.current_question + 1
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    /// The terminal condition: the index has reached the question count.
    pub fn finished(&self) -> bool {
        self.current_question >= self.questions.len()
    }

    /// Restarts the answer timer. Called when the playing screen becomes
    /// active so time spent in the lobby never counts against the player.
    pub fn begin_question(&mut self, now: Duration) {
        self.question_started = now;
    }

    /// Records the player's choice for the current question. Returns false
    /// when the click is a no-op: a reveal is in progress or the session is
    /// already finished.
    pub fn answer(&mut self, choice: usize, now: Duration, rng: &mut impl Rng) -> bool {
        if self.selected_answer.is_some() {
            return false;
        }
        let Some(question) = self.questions.get(self.current_question) else {
            return false;
        };
        self.selected_answer = Some(choice);
        if choice == question.answer {
            self.score += answer_award(now.saturating_sub(self.question_started));
        }
        if self.multiplayer {
            self.opponent_score += opponent_award(rng);
        }
        self.reveal_until = Some(now + REVEAL_DELAY);
        true
    }

    /// Moves past a revealed answer once its deadline has passed. Returns
    /// true exactly once per answered question.
    pub fn advance_if_due(&mut self, now: Duration) -> bool {
        match self.reveal_until {
            Some(deadline) if now >= deadline => {
                self.reveal_until = None;
                self.selected_answer = None;
                self.current_question += 1;
                self.question_started = now;
                true
            }
            _ => false,
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.score > self.opponent_score {
            Outcome::Win
        } else if self.score < self.opponent_score {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }
}

/// Score for a correct answer: the base plus a bonus that decays one point
/// per full elapsed second and bottoms out at zero.
pub fn answer_award(elapsed: Duration) -> u32 {
    BASE_AWARD + MAX_TIME_BONUS.saturating_sub(elapsed.as_secs()) as u32
}

/// One opponent draw: a Bernoulli trial, with a flat bonus on success.
pub fn opponent_award(rng: &mut impl Rng) -> u32 {
    if rng.gen_bool(OPPONENT_HIT_RATE) {
        BASE_AWARD + rng.gen_range(0..=50)
    } else {
        0
    }
}

#[derive(Resource)]
struct WaitingCountdown(Timer);

pub struct QuizPlugin;

impl Plugin for QuizPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameRng>()
            .init_resource::<Lobby>()
            .init_resource::<Session>()
            .add_systems(OnEnter(Screen::Waiting), arm_waiting_countdown)
            .add_systems(OnEnter(Screen::Playing), stamp_question_start)
            .add_systems(OnEnter(Screen::Result), celebrate_win)
            .add_systems(
                Update,
                waiting_countdown.run_if(in_state(Screen::Waiting)),
            )
            .add_systems(
                Update,
                reveal_then_advance.run_if(in_state(Screen::Playing)),
            );
    }
}

fn arm_waiting_countdown(mut commands: Commands) {
    commands.insert_resource(WaitingCountdown(Timer::from_seconds(
        WAITING_PERIOD,
        TimerMode::Once,
    )));
}

fn waiting_countdown(
    time: Res<Time>,
    mut countdown: ResMut<WaitingCountdown>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if countdown.0.tick(time.delta()).just_finished() {
        next_screen.set(Screen::Playing);
    }
}

fn stamp_question_start(time: Res<Time>, mut session: ResMut<Session>) {
    session.begin_question(time.elapsed());
}

fn reveal_then_advance(
    time: Res<Time>,
    mut session: ResMut<Session>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if session.advance_if_due(time.elapsed()) && session.finished() {
        info!(
            "round over: {} vs {} -> {:?}",
            session.score,
            session.opponent_score,
            session.outcome()
        );
        next_screen.set(Screen::Result);
    }
}

fn celebrate_win(
    session: Res<Session>,
    mut fx: ResMut<ParticleSystem>,
    mut rng: ResMut<GameRng>,
) {
    if session.outcome() == Outcome::Win && !fx.is_active() {
        fx.start_celebration(WINDOW_WIDTH, WINDOW_HEIGHT, &mut rng.0);
        info!("win celebration: {} particles", fx.particle_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bank() -> QuestionBank {
        QuestionBank::load_embedded().expect("embedded table must be valid")
    }

    fn rng(seed: u8) -> StdRng {
        StdRng::from_seed([seed; 32])
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn award_decays_per_second_and_bottoms_out() {
        assert_eq!(answer_award(secs(0)), 150);
        assert_eq!(answer_award(Duration::from_millis(900)), 150);
        assert_eq!(answer_award(secs(1)), 149);
        assert_eq!(answer_award(secs(49)), 101);
        assert_eq!(answer_award(secs(50)), 100);
        assert_eq!(answer_award(secs(1000)), 100);
    }

    #[test]
    fn opponent_award_is_zero_or_in_band() {
        let mut rng = rng(7);
        let mut hits = 0;
        for _ in 0..1000 {
            let award = opponent_award(&mut rng);
            if award == 0 {
                continue;
            }
            assert!((100..=150).contains(&award), "award {award} out of band");
            hits += 1;
        }
        // 70% Bernoulli over 1000 draws stays comfortably inside this band.
        assert!((600..=800).contains(&hits), "{hits} hits");
    }

    #[test]
    fn lobby_code_is_six_digits() {
        let code = lobby_code(&mut rng(1));
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let bank = test_bank();
        let session = Session::start(
            Difficulty::Beginner,
            &bank,
            false,
            secs(0),
            &mut rng(3),
        );
        let mut shuffled: Vec<&str> = session.questions.iter().map(|q| q.text.as_str()).collect();
        let mut unshuffled: Vec<&str> = bank
            .tier(Difficulty::Beginner)
            .iter()
            .map(|q| q.text.as_str())
            .collect();
        shuffled.sort_unstable();
        unshuffled.sort_unstable();
        assert_eq!(shuffled, unshuffled);
    }

    #[test]
    fn index_stays_in_bounds_and_round_terminates() {
        let bank = test_bank();
        let mut rng = rng(11);
        let mut session = Session::start(Difficulty::Hard, &bank, false, secs(0), &mut rng);
        let mut now = secs(0);
        for _ in 0..session.question_count() {
            assert!(session.current_question <= session.question_count());
            let choice = session.question().map(|q| q.answer).unwrap_or(0);
            assert!(session.answer(choice, now, &mut rng));
            now += REVEAL_DELAY;
            assert!(session.advance_if_due(now));
        }
        assert!(session.finished());
        assert_eq!(session.current_question, session.question_count());
        assert!(!session.answer(0, now, &mut rng), "no answers after the end");
    }

    #[test]
    fn perfect_single_player_round_wins_with_750() {
        let bank = test_bank();
        let mut rng = rng(5);
        let mut session = Session::start(Difficulty::Beginner, &bank, false, secs(0), &mut rng);
        let mut now = secs(0);
        while !session.finished() {
            let correct = session.question().map(|q| q.answer).unwrap_or(0);
            assert!(session.answer(correct, now, &mut rng));
            now += REVEAL_DELAY;
            assert!(session.advance_if_due(now));
        }
        assert_eq!(session.score, 750);
        assert_eq!(session.opponent_score, 0);
        assert_eq!(session.outcome(), Outcome::Win);
        assert_eq!(session.outcome().message(), "Congratulations! You Won!");
    }

    #[test]
    fn all_wrong_multiplayer_round_matches_score_comparison() {
        let bank = test_bank();
        let mut rng = rng(42);
        let mut session =
            Session::start(Difficulty::Intermediate, &bank, true, secs(0), &mut rng);
        let mut now = secs(0);
        while !session.finished() {
            let correct = session.question().map(|q| q.answer).unwrap_or(0);
            let wrong = (correct + 1) % 4;
            assert!(session.answer(wrong, now, &mut rng));
            now += REVEAL_DELAY;
            assert!(session.advance_if_due(now));
        }
        assert_eq!(session.score, 0);
        let expected = if session.opponent_score > 0 {
            Outcome::Loss
        } else {
            Outcome::Tie
        };
        assert_eq!(session.outcome(), expected);
    }

    #[test]
    fn clicks_during_reveal_are_no_ops() {
        let bank = test_bank();
        let mut rng = rng(9);
        let mut session = Session::start(Difficulty::Beginner, &bank, false, secs(0), &mut rng);
        let correct = session.question().map(|q| q.answer).unwrap_or(0);
        assert!(session.answer(correct, secs(2), &mut rng));
        let score = session.score;

        assert!(!session.answer(correct, secs(2), &mut rng));
        assert_eq!(session.score, score, "second click must not re-award");
        assert_eq!(session.selected_answer(), Some(correct));
    }

    #[test]
    fn advance_waits_for_the_reveal_deadline() {
        let bank = test_bank();
        let mut rng = rng(13);
        let mut session = Session::start(Difficulty::Beginner, &bank, false, secs(0), &mut rng);
        assert!(!session.advance_if_due(secs(10)), "nothing to advance yet");

        session.answer(0, secs(10), &mut rng);
        assert!(!session.advance_if_due(secs(10)));
        assert!(!session.advance_if_due(secs(10) + REVEAL_DELAY / 2));
        assert!(session.advance_if_due(secs(10) + REVEAL_DELAY));
        assert_eq!(session.question_number(), 2);
        assert!(
            !session.advance_if_due(secs(100)),
            "advance fires once per answer"
        );
    }

    #[test]
    fn lobby_time_does_not_count_against_the_player() {
        let bank = test_bank();
        let mut rng = rng(21);
        let mut session = Session::start(Difficulty::Beginner, &bank, true, secs(0), &mut rng);
        // The playing screen re-stamps the timer after the lobby countdown.
        session.begin_question(secs(30));
        let correct = session.question().map(|q| q.answer).unwrap_or(0);
        session.answer(correct, secs(30), &mut rng);
        assert_eq!(session.score, 150, "full bonus despite 30s in the lobby");
    }

    #[test]
    fn tie_when_scores_are_equal() {
        let bank = test_bank();
        let session = Session::start(Difficulty::Beginner, &bank, false, secs(0), &mut rng(2));
        assert_eq!(session.outcome(), Outcome::Tie);
        assert_eq!(session.outcome().message(), "It's a Tie!");
    }
}
