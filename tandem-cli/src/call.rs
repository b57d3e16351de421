use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use tandem_agent::{
    AgentConfig, AgentEvent, AgentHandle, NegotiationAgent, NegotiationState, PeerState,
    SyntheticMediaDevices, WebRtcFactory,
};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(url: String, room: String, name: String) -> Result<()> {
    let config = AgentConfig::new(room.as_str())
        .with_signaling_url(url.as_str())
        .with_sender_label(name.as_str());
    let (mut agent, mut events, inbound) = NegotiationAgent::connect(
        config,
        Arc::new(WebRtcFactory),
        Arc::new(SyntheticMediaDevices::new()),
    )
    .await
    .with_context(|| format!("Could not reach signaling server at {url}"))?;
    agent.start().await.context("Failed to start the session")?;

    println!(
        "{} {} {}",
        "Joined room".green(),
        room.bold(),
        format!("as {name}").dimmed()
    );
    println!(
        "{}",
        "Type to chat. Commands: /mute /video /share /unshare /quit".dimmed()
    );

    let handle = agent.handle();
    let mut agent_task = tokio::spawn(agent.run(inbound));
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !run_line(&handle, line.trim()).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = &mut agent_task => {
                let _ = printer.await;
                return Ok(());
            }
        }
    }

    handle.teardown();
    agent_task.await.context("Agent task panicked")?;
    let _ = printer.await;
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn run_line(handle: &AgentHandle, line: &str) -> bool {
    let outcome = match line {
        "" => return true,
        "/quit" => return false,
        "/mute" => handle.toggle_audio().map(|on| {
            let status = if on { "Microphone on" } else { "Microphone muted" };
            println!("{}", status.yellow());
        }),
        "/video" => handle.toggle_video().map(|on| {
            let status = if on { "Camera on" } else { "Camera off" };
            println!("{}", status.yellow());
        }),
        "/share" => handle.share_screen().await,
        "/unshare" => handle.stop_screen_share().await,
        cmd if cmd.starts_with('/') => {
            println!("{} {}", "Unknown command:".red(), cmd);
            return true;
        }
        text => handle.send_chat(text).await,
    };

    if let Err(e) = outcome {
        println!("{} {}", "Error:".red().bold(), e);
    }
    true
}

fn print_event(event: &AgentEvent) {
    match event {
        AgentEvent::ChatReceived { text, sender } => {
            println!("{}: {}", sender.cyan().bold(), text);
        }
        AgentEvent::ChatSent { text } => println!("{}: {}", "you".green().bold(), text),
        AgentEvent::RoomCreated => println!("{}", "Waiting for someone to join...".dimmed()),
        AgentEvent::RoleAssigned(role) => println!("{}", format!("Role: {role}").dimmed()),
        AgentEvent::RoomFull => println!("{}", "Room is full. Try another one.".red().bold()),
        AgentEvent::PeerLeft => println!("{}", "Peer left the call.".yellow()),
        AgentEvent::StateChanged(NegotiationState::Connected) => {
            println!("{}", "Connected.".green().bold());
        }
        AgentEvent::StateChanged(state) => println!("{}", format!("[{state}]").dimmed()),
        AgentEvent::PeerConnection(PeerState::Failed) => {
            println!("{}", "Direct connection failed.".red());
        }
        AgentEvent::PeerConnection(_) => {}
        AgentEvent::RemoteTrack { kind, .. } => {
            println!("{}", format!("Receiving remote {kind}").dimmed());
        }
        AgentEvent::ScreenShareStarted => println!("{}", "Sharing screen".yellow()),
        AgentEvent::ScreenShareEnded => println!("{}", "Back to camera".yellow()),
    }
}
