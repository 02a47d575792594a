mod game_flow;
mod health;
