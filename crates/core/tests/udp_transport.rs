use std::sync::Arc;
use std::time::Duration;

use strand_core::{
    unwrap_envelope, Command, LightOutput, Packet, Rgb, StripConfig, StripManager, UdpTransport,
};
use tokio::net::UdpSocket;
use tokio::time::timeout;

async fn receive(socket: &UdpSocket) -> Packet {
    let mut buf = [0u8; 1024];
    let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("timed out waiting for datagram")
        .unwrap();
    let frame = unwrap_envelope(&buf[..len]).unwrap();
    Packet::parse(&frame).unwrap()
}

#[tokio::test]
async fn test_first_frame_is_preceded_by_enable() {
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = device.local_addr().unwrap().port();

    let transport = UdpTransport::bind("127.0.0.1", port).await.unwrap();
    let colors = vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)];
    transport.send_colors(&colors, true).await.unwrap();

    let enable = receive(&device).await;
    assert_eq!(enable.command, Command::Enable);
    assert_eq!(enable.enabled(), Some(true));

    let data = receive(&device).await;
    assert_eq!(data.command, Command::LedData);
    assert_eq!(data.colors(), Some((true, colors.clone())));

    // Inside the keep-alive window only the colours go out
    transport.send_colors(&colors, false).await.unwrap();
    let data = receive(&device).await;
    assert_eq!(data.command, Command::LedData);
    assert_eq!(data.colors().map(|(gradient, _)| gradient), Some(false));
}

#[tokio::test]
async fn test_managed_strip_animates_and_blacks_out() {
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = device.local_addr().unwrap().port();

    let mut config = StripConfig::new("127.0.0.1", "Bench");
    config.port = port;
    config.num_leds = 6;
    config.num_sections = 3;

    let mut manager = StripManager::new();
    let entry = manager.add(config).await.unwrap();
    let controller = Arc::clone(&entry.controller);
    controller.set_wave(Some(0), None).unwrap();
    for section in &entry.sections {
        section.turn_on(Some(Rgb::new(0, 255, 0)), None).await;
    }

    // Loop start sends an Enable, then the first frame
    assert_eq!(receive(&device).await.enabled(), Some(true));
    let first = receive(&device).await;
    let (gradient, colors) = first.colors().unwrap();
    assert!(gradient);
    assert_eq!(colors, vec![Rgb::new(0, 128, 0); 6]);

    controller.turn_off();
    manager.shutdown_all().await;

    // Drain whatever frames were in flight; the last one is the blackout
    let mut last = Vec::new();
    let mut buf = [0u8; 1024];
    while let Ok(received) = timeout(Duration::from_millis(200), device.recv_from(&mut buf)).await {
        let (len, _) = received.unwrap();
        last = buf[..len].to_vec();
    }

    let frame = unwrap_envelope(&last).unwrap();
    let (_, colors) = Packet::parse(&frame).unwrap().colors().unwrap();
    assert_eq!(colors, vec![Rgb::BLACK; 3]);
}
