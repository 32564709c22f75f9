// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end protocol scenarios: scripted turtles against a real
//! in-process controller over WebSockets.

use std::time::Duration;

use serde_json::json;

use warren_specs::{quarry_config, spawn_controller, TurtleSim};

const POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Success responder with a comfortable fuel level.
fn fueled(command: &str) -> (bool, serde_json::Value) {
    if command.contains("getFuelLevel") {
        (true, json!(1000))
    } else {
        (true, serde_json::Value::Null)
    }
}

// ── registration handshake ────────────────────────────────────────────

#[tokio::test]
async fn register_is_acknowledged() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.register(7).await?;
    sim.expect_data("Registered").await?;

    // The strategy starts immediately: the first frame after the ack is a
    // command, and every command is an expression-returning snippet.
    let command = sim.recv_command().await?;
    assert!(command.contains("return"), "command: {command}");
    Ok(())
}

#[tokio::test]
async fn unknown_frame_kind_is_rejected() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    let payload = json!({"type": "blargh", "id": 1});
    sim.send_json(&payload).await?;

    let frame = sim.recv_json().await?;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], format!("Could not parse: {payload}"));

    // The controller closes after the error frame.
    assert!(sim.recv_json().await.is_err());
    Ok(())
}

#[tokio::test]
async fn non_register_first_frame_is_rejected() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.send_json(&json!({"type": "data", "message": "hello"})).await?;

    let frame = sim.recv_json().await?;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], "First frame must be register, got data");
    Ok(())
}

#[tokio::test]
async fn unparseable_first_frame_is_rejected() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.send_raw("not json").await?;

    let frame = sim.recv_json().await?;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], "Could not parse: not json");
    Ok(())
}

// ── full strategy runs ────────────────────────────────────────────────

#[tokio::test]
async fn quarry_run_serves_the_full_serpentine() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.register(1).await?;
    sim.expect_data("Registered").await?;

    let farewell = sim.serve_until_data(fueled).await?;
    assert_eq!(farewell, "Deregistered");

    // Every command is an expression-returning snippet.
    assert!(sim.commands.iter().all(|c| c.contains("return")));

    // The movement sequence (fuel reads aside) is the 2x2 serpentine, one
    // descent, and the walk home.
    let moves: Vec<&str> = sim
        .commands
        .iter()
        .filter(|c| !c.contains("getFuelLevel"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        moves,
        [
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.digDown()",
            "return turtle.down()",
            "return turtle.digUp()",
            "return turtle.up()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn fuel_guard_walks_the_agent_home() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.register(2).await?;
    sim.expect_data("Registered").await?;

    // Two units of fuel: the run is preempted once the return cost catches
    // up, and the halt still ends in a clean deregistration.
    let farewell = sim
        .serve_until_data(|command| {
            if command.contains("getFuelLevel") {
                (true, json!(2))
            } else {
                (true, serde_json::Value::Null)
            }
        })
        .await?;
    assert_eq!(farewell, "Deregistered");

    let moves: Vec<&str> = sim
        .commands
        .iter()
        .filter(|c| !c.contains("getFuelLevel"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        moves,
        [
            // quarry start
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            // third dig goes out, but the move behind it is preempted
            "return turtle.dig()",
            // guard-driven walk home: west leg, south leg, realign north
            "return turtle.turnRight()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.turnRight()",
            "return turtle.turnRight()",
            "return turtle.dig()",
            "return turtle.forward()",
            "return turtle.turnRight()",
            "return turtle.turnRight()",
        ]
    );
    Ok(())
}

// ── status view ───────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_identity_and_count() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let health: serde_json::Value =
        reqwest::get(format!("http://{addr}/api/v1/health")).await?.json().await?;
    assert_eq!(health["status"], "running");
    assert_eq!(health["name"], "warren");
    assert_eq!(health["agents"], 0);

    let status = reqwest::get(format!("http://{addr}/api/v1/status")).await?.text().await?;
    assert_eq!(status, "No agents connected\n");
    Ok(())
}

#[tokio::test]
async fn idle_agent_appears_in_the_status_view() -> anyhow::Result<()> {
    let (addr, _state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.register(9).await?;
    sim.expect_data("Registered").await?;
    // Leave the first command unanswered: the driver waits, the agent stays
    // registered, and the snapshot shows the pending command.

    let client = reqwest::Client::new();
    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
    loop {
        let agents: serde_json::Value =
            client.get(format!("http://{addr}/api/v1/agents")).send().await?.json().await?;
        if agents.as_array().is_some_and(|a| a.len() == 1) {
            assert_eq!(agents[0]["uid"], 9);
            break;
        }
        anyhow::ensure!(tokio::time::Instant::now() < deadline, "agent never appeared");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let status = client.get(format!("http://{addr}/api/v1/status")).send().await?.text().await?;
    assert!(status.contains("Agent 9"), "status: {status}");
    assert!(status.contains("Position:        (0, 0, 0)"), "status: {status}");
    Ok(())
}

#[tokio::test]
async fn disconnect_removes_the_agent_from_the_active_set() -> anyhow::Result<()> {
    let (addr, state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut sim = TurtleSim::connect(&addr).await?;
    sim.register(4).await?;
    sim.expect_data("Registered").await?;
    drop(sim);

    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
    loop {
        if state.agents.read().await.is_empty() {
            return Ok(());
        }
        anyhow::ensure!(tokio::time::Instant::now() < deadline, "agent never deregistered");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn duplicate_uids_both_stay_active() -> anyhow::Result<()> {
    let (addr, state) = spawn_controller(quarry_config(2, 0)).await?;

    let mut first = TurtleSim::connect(&addr).await?;
    first.register(5).await?;
    first.expect_data("Registered").await?;

    let mut second = TurtleSim::connect(&addr).await?;
    second.register(5).await?;
    second.expect_data("Registered").await?;

    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
    loop {
        if state.agents.read().await.len() == 2 {
            return Ok(());
        }
        anyhow::ensure!(tokio::time::Instant::now() < deadline, "second agent never appeared");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
