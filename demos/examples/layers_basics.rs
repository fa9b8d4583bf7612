// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer basics.
//!
//! A splash screen hands over to a menu, the menu starts a game with a level message,
//! and a HUD is activated next to the game. The splash screen deletes itself and is
//! torn down by the following sweep. A trace sink prints every transition.
//!
//! Run:
//! - `cargo run -p understory_demos --example layers_basics`

use understory_layers::layer::{Context, Layer};
use understory_layers::manager::LayerManager;
use understory_layers::trace::{RequestEvent, SweepSummary, TraceSink, TransitionEvent};

#[derive(Debug, Default)]
struct Score {
    frames: u32,
    points: u32,
}

struct Splash {
    frames: u32,
}

impl Layer<Score> for Splash {
    fn name(&self) -> &str {
        "Splash"
    }

    fn update(&mut self, cx: &mut Context<'_, Score>) {
        self.frames += 1;
        if self.frames == 3 {
            cx.switch_layer("Menu");
            cx.delete_self();
        }
    }

    fn exit(&mut self, _cx: &mut Context<'_, Score>) {
        println!("  [Splash] freed after {} frames", self.frames);
    }
}

struct Menu;

impl Layer<Score> for Menu {
    fn name(&self) -> &str {
        "Menu"
    }

    fn setup(&mut self, _cx: &mut Context<'_, Score>) {
        println!("  [Menu] loading menu assets");
    }

    fn update(&mut self, cx: &mut Context<'_, Score>) {
        // The player picks a level straight away.
        cx.switch_layer_with_message("Game", "level-2");
    }
}

#[derive(Default)]
struct Game {
    level: String,
}

impl Layer<Score> for Game {
    fn name(&self) -> &str {
        "Game"
    }

    fn activate(&mut self, cx: &mut Context<'_, Score>) {
        if let Some(level) = cx.message() {
            self.level = level.to_owned();
        }
        println!("  [Game] playing {}", self.level);
        cx.activate_layer("Hud");
    }

    fn update(&mut self, cx: &mut Context<'_, Score>) {
        let score = cx.shared_mut();
        score.frames += 1;
        score.points += 10;
    }

    fn deactivate(&mut self, cx: &mut Context<'_, Score>) {
        cx.deactivate_layer("Hud");
    }
}

struct Hud;

impl Layer<Score> for Hud {
    fn name(&self) -> &str {
        "Hud"
    }

    fn draw(&mut self, cx: &mut Context<'_, Score>) {
        println!("  [Hud] points={}", cx.shared().points);
    }
}

struct Printer;

impl TraceSink for Printer {
    fn on_request(&mut self, e: &RequestEvent<'_>) {
        if !e.resolved {
            println!("  ! no layer named {:?}", e.request.target);
        }
    }

    fn on_transition(&mut self, e: &TransitionEvent<'_>) {
        println!("  {:<6} {:?}", e.name, e.kind);
    }

    fn on_sweep(&mut self, s: &SweepSummary) {
        println!(
            "-- sweep {}: updated={} removed={} remaining={}",
            s.frame_index, s.updated, s.removed, s.remaining
        );
    }
}

fn main() {
    let mut layers = LayerManager::new(Score::default());
    layers.set_trace_sink(Some(Box::new(Printer)));

    for result in [
        layers.add_layer(Splash { frames: 0 }),
        layers.add_layer(Menu),
        layers.add_layer(Game::default()),
        layers.add_layer(Hud),
        layers.add_layer(Menu),
    ] {
        if let Err(err) = result {
            println!("refused: {err}");
        }
    }

    layers.switch_layer("Splash");
    // Typos are ignored.
    layers.switch_layer("Splsh");

    for _ in 0..6 {
        layers.update();
        layers.draw();
    }

    println!("== Registry ==");
    for name in layers.layer_names() {
        println!("  {name}: {:?}", layers.flags(&name));
    }
    println!("  shared: {:?}", layers.shared_app_data());

    println!("== Exit ==");
    layers.exit();
}
