/// Fixed playfield and match parameters for Prompt Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Playfield (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_SPEED: f32 = 7.0; // pixels per tick

    // Ball
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_INITIAL_SPEED: f32 = 5.0; // pixels per tick, per axis
    pub const BALL_ACCELERATION: f32 = 0.1; // added per paddle hit

    // Match
    pub const MAX_SCORE: u8 = 5;
    pub const COUNTDOWN_SECONDS: u8 = 3;

    // Loop
    pub const FPS: u32 = 60;
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    pub const GATEWAY_TIMEOUT_SECS: f32 = 30.0;
}
