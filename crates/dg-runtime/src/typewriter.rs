use std::time::Duration;

/// Audible tick played for each revealed non-whitespace character.
pub trait TypingSound {
    fn play_tick(&mut self, ch: char);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTypingSound;

impl TypingSound for NullTypingSound {
    fn play_tick(&mut self, _ch: char) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    Idle,
    Typing,
    Complete,
}

/// Result of advancing a reveal: text to append to the surface, and whether
/// this step finished the reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypewriterStep {
    pub appended: String,
    pub completed: bool,
}

impl TypewriterStep {
    fn idle() -> Self {
        Self::default()
    }
}

/// Tick-driven character reveal.
///
/// The first character appears as soon as a reveal starts and each elapsed
/// interval reveals one more. After the last character one further interval
/// passes before the reveal completes, so a text of `n` characters completes
/// `n * interval` after `start`.
pub struct Typewriter {
    interval: Duration,
    phase: TypewriterPhase,
    chars: Vec<char>,
    revealed: usize,
    elapsed: Duration,
    generation: u64,
    sound: Box<dyn TypingSound>,
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("interval", &self.interval)
            .field("phase", &self.phase)
            .field("revealed", &self.revealed)
            .field("len", &self.chars.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Typewriter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            phase: TypewriterPhase::Idle,
            chars: Vec::new(),
            revealed: 0,
            elapsed: Duration::ZERO,
            generation: 0,
            sound: Box::new(NullTypingSound),
        }
    }

    pub fn set_sound(&mut self, sound: Box<dyn TypingSound>) {
        self.sound = sound;
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn is_typing(&self) -> bool {
        self.phase == TypewriterPhase::Typing
    }

    /// Bumped by every start and cancel; a caller holding an older value
    /// knows its reveal was abandoned.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn visible_text(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    pub fn start(&mut self, text: &str) -> TypewriterStep {
        self.generation += 1;
        self.chars = text.chars().collect();
        self.revealed = 0;
        self.elapsed = Duration::ZERO;

        if self.chars.is_empty() {
            self.phase = TypewriterPhase::Complete;
            return TypewriterStep {
                appended: String::new(),
                completed: true,
            };
        }

        self.phase = TypewriterPhase::Typing;
        let mut appended = String::new();
        self.reveal_next(&mut appended);
        TypewriterStep {
            appended,
            completed: false,
        }
    }

    pub fn tick(&mut self, delta: Duration) -> TypewriterStep {
        if self.phase != TypewriterPhase::Typing {
            return TypewriterStep::idle();
        }

        let mut appended = String::new();
        if self.interval.is_zero() {
            while self.revealed < self.chars.len() {
                self.reveal_next(&mut appended);
            }
            self.phase = TypewriterPhase::Complete;
            return TypewriterStep {
                appended,
                completed: true,
            };
        }

        self.elapsed += delta;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if self.revealed < self.chars.len() {
                self.reveal_next(&mut appended);
            } else {
                self.phase = TypewriterPhase::Complete;
                self.elapsed = Duration::ZERO;
                return TypewriterStep {
                    appended,
                    completed: true,
                };
            }
        }

        TypewriterStep {
            appended,
            completed: false,
        }
    }

    /// Reveals everything at once. Outside of a reveal this does nothing.
    pub fn skip(&mut self) -> TypewriterStep {
        if self.phase != TypewriterPhase::Typing {
            return TypewriterStep::idle();
        }

        let appended = self.chars[self.revealed..].iter().collect::<String>();
        self.revealed = self.chars.len();
        self.elapsed = Duration::ZERO;
        self.phase = TypewriterPhase::Complete;
        TypewriterStep {
            appended,
            completed: true,
        }
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.phase = TypewriterPhase::Idle;
        self.elapsed = Duration::ZERO;
    }

    /// Puts `text` on screen fully revealed without playing a reveal.
    pub fn show_complete(&mut self, text: &str) {
        self.generation += 1;
        self.chars = text.chars().collect();
        self.revealed = self.chars.len();
        self.elapsed = Duration::ZERO;
        self.phase = TypewriterPhase::Complete;
    }

    fn reveal_next(&mut self, out: &mut String) {
        let ch = self.chars[self.revealed];
        self.revealed += 1;
        out.push(ch);
        if !ch.is_whitespace() {
            self.sound.play_tick(ch);
        }
    }
}
