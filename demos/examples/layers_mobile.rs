// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mobile host wiring.
//!
//! A toy host keeps a subscription table, replays a short event script, and only
//! forwards events on subscribed topics. The game answers the back button by returning
//! to the menu; the menu declines it, which tells the host to quit.
//!
//! Run:
//! - `cargo run -p understory_demos --example layers_mobile`

use kurbo::Point;
use understory_layers::event::{HostEvent, LifecycleEvent, TouchEvent, TouchPhase};
use understory_layers::layer::{Context, Layer};
use understory_layers::manager::LayerManager;
use understory_layers::profile::{Mobile, Touch};
use understory_layers::source::EventSource;
use understory_layers::types::Topics;

#[derive(Debug, Default)]
struct Host {
    topics: Topics,
}

impl EventSource for Host {
    fn subscribe(&mut self, topics: Topics) {
        println!("  host: +{topics:?}");
        self.topics |= topics;
    }

    fn unsubscribe(&mut self, topics: Topics) {
        println!("  host: -{topics:?}");
        self.topics.remove(topics);
    }
}

struct Menu;

impl Layer for Menu {
    fn name(&self) -> &str {
        "Menu"
    }

    fn touch(&mut self, event: &TouchEvent, cx: &mut Context<'_>) {
        if event.phase == TouchPhase::Up {
            println!("  [Menu] tapped at {:?}", event.position);
            cx.switch_layer("Game");
        }
    }
}

struct Game {
    paused: bool,
}

impl Layer for Game {
    fn name(&self) -> &str {
        "Game"
    }

    fn update(&mut self, _cx: &mut Context<'_>) {
        if !self.paused {
            println!("  [Game] tick");
        }
    }

    fn lifecycle(&mut self, event: &LifecycleEvent, cx: &mut Context<'_>) -> bool {
        match event {
            LifecycleEvent::Pause => self.paused = true,
            LifecycleEvent::Resume => self.paused = false,
            LifecycleEvent::BackPressed => {
                cx.switch_layer("Menu");
                return true;
            }
            _ => {}
        }
        false
    }
}

fn main() {
    let mut layers = LayerManager::with_source((), Host::default(), Mobile(Touch));
    layers.add_layer(Menu).expect("fresh name");
    layers.add_layer(Game { paused: false }).expect("fresh name");
    layers.switch_layer("Menu");

    let tap = HostEvent::Touch(TouchEvent {
        phase: TouchPhase::Up,
        id: 0,
        position: Point::new(120.0, 40.0),
    });
    let script = [
        HostEvent::Update,
        tap,
        HostEvent::Update,
        HostEvent::Lifecycle(LifecycleEvent::Pause),
        HostEvent::Update,
        HostEvent::Lifecycle(LifecycleEvent::Resume),
        HostEvent::Update,
        HostEvent::Lifecycle(LifecycleEvent::BackPressed),
        HostEvent::Lifecycle(LifecycleEvent::BackPressed),
    ];

    for event in &script {
        if !layers.source().topics.intersects(event.topic()) {
            continue;
        }
        let handled = layers.handle_event(event);
        if let HostEvent::Lifecycle(LifecycleEvent::BackPressed) = event {
            println!("back pressed: handled={handled}");
            if !handled {
                println!("no layer wants the back button; quitting");
                layers.handle_event(&HostEvent::Exit);
                break;
            }
        }
    }
    println!("subscribed after exit: {:?}", layers.subscriptions());
}
