//! BDD step definitions for the indicator blinking feature

use cucumber::{given, then, when};

use statuslight::indicator::{ChannelIntent, ChannelState};

use crate::world::StatusLightWorld;

#[given(expr = "a channel blinking from tick {int} with interval {int}")]
fn channel_blinking(world: &mut StatusLightWorld, start: u32, interval: u32) {
    let mut channel = ChannelState::default();
    channel.set_intent(ChannelIntent::Blink, start);
    world.channel = Some(channel);
    world.blink_start = start;
    world.blink_interval = interval;
}

#[given("a channel steady on")]
fn channel_steady_on(world: &mut StatusLightWorld) {
    let mut channel = ChannelState::default();
    channel.set_intent(ChannelIntent::On, 0);
    world.channel = Some(channel);
    world.blink_interval = 500;
}

#[when(expr = "the channel is ticked every 1 ms for {int} ms")]
fn tick_channel(world: &mut StatusLightWorld, duration: u32) {
    let channel = world.channel.as_mut().expect("channel not set");
    for step in 1..=duration {
        if channel.advance(world.blink_start.wrapping_add(step), world.blink_interval) {
            world.toggles += 1;
        }
    }
}

#[then(expr = "the channel should have toggled {int} times")]
fn toggled_times(world: &mut StatusLightWorld, expected: u32) {
    assert_eq!(world.toggles, expected);
}

#[then("the channel output should be on")]
fn output_on(world: &mut StatusLightWorld) {
    let channel = world.channel.expect("channel not set");
    assert!(channel.output());
}
