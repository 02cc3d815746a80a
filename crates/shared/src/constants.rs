// Tick rate
pub const TICK_RATE: u32 = 60;
pub const TICK_DURATION_US: u64 = 16_667;
pub const MAX_TICK_RATE: u32 = 1_000;

// Match clock
pub const MATCH_DURATION_MS: u64 = 180_000;
pub const CELEBRATION_MS: u64 = 2_000;
pub const MAX_MATCH_DURATION_MS: u64 = 24 * 60 * 60 * 1000;
pub const MAX_CELEBRATION_MS: u64 = 60_000;

// Pitch (origin at the top-left corner of the playfield, y grows downwards)
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;
pub const GOAL_TOP: f32 = 240.0;
pub const GOAL_BOTTOM: f32 = 360.0;
pub const OUT_INSET: f32 = 15.0;

// Ball
pub const BALL_RADIUS: f32 = 6.0;
pub const BALL_MAX_SPEED: f32 = 5.0;
pub const BALL_FRICTION: f32 = 0.97;
pub const VELOCITY_DEADBAND: f32 = 0.05;

// Player
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 2.5;
pub const RED_START: [f32; 2] = [100.0, 280.0];
pub const BLUE_START: [f32; 2] = [660.0, 280.0];

// Ball interaction (all distances measured from the foot point)
pub const KICK_RADIUS: f32 = 40.0;
pub const KICK_POWER: f32 = 2.5;
pub const POSSESSION_RADIUS: f32 = 20.0;
pub const PASS_POWER: f32 = 2.5;
pub const DRIBBLE_RADIUS: f32 = 20.0;
pub const DRIBBLE_POWER: f32 = 0.5;
pub const TACKLE_RADIUS: f32 = 25.0;

// Behavior engine
pub const CAPTURE_RADIUS: f32 = 25.0;
pub const SHOT_RADIUS: f32 = 60.0;
pub const GOAL_TARGET_DEPTH: f32 = 20.0;
pub const PASS_PREFERENCE_RADIUS: f32 = 120.0;
pub const CHASE_RADIUS: f32 = 40.0;
pub const MARKING_OFFSET: f32 = 20.0;
pub const AXIS_DEAD_ZONE: f32 = 0.2;
pub const ZIGZAG_PERIOD_TICKS: u32 = 18; // ~300ms at 60Hz
pub const ACTION_COOLDOWN_TICKS: u32 = 15;
pub const RED_HOME_X: f32 = 100.0;
pub const BLUE_HOME_X: f32 = 700.0;

// Observation / action contract
pub const OBS_SIZE: usize = 6;
pub const ACTION_COUNT: usize = 6;
pub const OBS_VELOCITY_SCALE: f32 = 10.0;
pub const MAX_MODEL_SIZE_BYTES: u64 = 10 * 1024 * 1024;

// Frame streaming
pub const FRAME_INTERVAL: u32 = 2; // every 2nd tick = 30fps

// Training environment
pub const MAX_EPISODE_STEPS: u32 = 1_000;
pub const ENV_PLAYER_START: [f32; 2] = [700.0, 280.0];
pub const GOAL_LINE_MARGIN: f32 = 5.0;

// Tournament scoring
pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;
