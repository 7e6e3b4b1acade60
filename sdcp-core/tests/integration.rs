//! Integration tests — full one-shot control exchanges and discovery
//! rounds over real sockets on localhost.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;

use sdcp_core::{
    Community, DeviceDescriptor, DiscoveryConfig, ErrorCode, PictureSetting, PowerState,
    Projector, SdcpError, discover,
};

// ── Helpers ──────────────────────────────────────────────────────

/// Spin up a one-shot mock projector: accept a single connection, read
/// one request frame, answer with the canned response bytes. Returns
/// the address and a handle resolving to the captured request.
async fn one_shot_device(response: Vec<u8>) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(&response).await.unwrap();
        request
    });
    (addr, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut header = [0u8; 10];
    stream.read_exact(&mut header).await.unwrap();
    let mut request = header.to_vec();
    let data_len = header[9] as usize;
    if data_len > 0 {
        let mut data = vec![0u8; data_len];
        stream.read_exact(&mut data).await.unwrap();
        request.extend_from_slice(&data);
    }
    request
}

fn descriptor(address: SocketAddr) -> DeviceDescriptor {
    DeviceDescriptor {
        version: 2,
        category: 1,
        community: Community::new("ABCD").unwrap(),
        device_id: "PJ".into(),
        product_name: "VPL-VW520".into(),
        serial_number: 1001,
        power_state: 0,
        location: String::new(),
        address: address.ip(),
    }
}

fn client(address: SocketAddr) -> Projector {
    Projector::new(descriptor(address))
        .with_port(address.port())
        .with_timeout(Duration::from_secs(1))
}

// ── Control exchanges ────────────────────────────────────────────

#[tokio::test]
async fn get_contrast_sends_documented_bytes() {
    // Success response echoing command 0x0010 with value 0x0032.
    let response = vec![
        0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x01, 0x00, 0x10, 0x02, 0x00, 0x32,
    ];
    let (addr, handle) = one_shot_device(response).await;

    let value = client(addr)
        .picture_setting(PictureSetting::Contrast)
        .await
        .unwrap();
    assert_eq!(value, 50);

    let request = handle.await.unwrap();
    assert_eq!(
        request,
        [0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x01, 0x00, 0x10, 0x00]
    );
}

#[tokio::test]
async fn set_power_sends_data_frame() {
    let response = vec![0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x01, 0x01, 0x30, 0x00];
    let (addr, handle) = one_shot_device(response).await;

    client(addr).set_power(true).await.unwrap();

    let request = handle.await.unwrap();
    // Set action, command 0x0130, data = StartUp (1).
    assert_eq!(
        request,
        [0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x00, 0x01, 0x30, 0x02, 0x00, 0x01]
    );
}

#[tokio::test]
async fn power_state_decodes_vocabulary() {
    let response = vec![
        0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x01, 0x01, 0x02, 0x02, 0x00, 0x03,
    ];
    let (addr, _handle) = one_shot_device(response).await;

    let state = client(addr).power_state().await.unwrap();
    assert_eq!(state, PowerState::PowerOn);
    assert!(state.is_on());
}

#[tokio::test]
async fn device_failure_surfaces_error_code() {
    // Failure flag with NotApplicableItem (0x0180) in the data field.
    let response = vec![
        0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x00, 0x00, 0x13, 0x02, 0x01, 0x80,
    ];
    let (addr, _handle) = one_shot_device(response).await;

    let err = client(addr)
        .picture_setting(PictureSetting::Hue)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SdcpError::Device(ErrorCode::NotApplicableItem)
    ));
    assert!(err.is_not_applicable());
}

#[tokio::test]
async fn unknown_error_code_fails_closed() {
    let response = vec![
        0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x00, 0x00, 0x10, 0x02, 0xBE, 0xEF,
    ];
    let (addr, _handle) = one_shot_device(response).await;

    let err = client(addr)
        .picture_setting(PictureSetting::Contrast)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SdcpError::UnknownCode {
            type_name: "ErrorCode",
            value: 0xBEEF,
        }
    ));
}

#[tokio::test]
async fn getter_without_data_is_an_error() {
    // Success, but the data field a getter needs is absent.
    let response = vec![0x02, 0x01, 0x41, 0x42, 0x43, 0x44, 0x01, 0x00, 0x10, 0x00];
    let (addr, _handle) = one_shot_device(response).await;

    let err = client(addr)
        .picture_setting(PictureSetting::Contrast)
        .await
        .unwrap_err();
    assert!(matches!(err, SdcpError::MissingData));
}

// ── Error scenarios ──────────────────────────────────────────────

#[tokio::test]
async fn silent_device_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request = read_request(&mut stream).await;
        // Never answer.
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let err = client(addr)
        .with_timeout(Duration::from_millis(200))
        .power_state()
        .await
        .unwrap_err();
    assert!(matches!(err, SdcpError::Timeout(_)));
}

#[tokio::test]
async fn connection_refused_is_a_connection_error() {
    // Grab a port that nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).power_state().await.unwrap_err();
    assert!(matches!(err, SdcpError::Connection(_)));
}

#[tokio::test]
async fn connection_closed_before_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request = read_request(&mut stream).await;
        // Close without answering.
    });

    let err = client(addr).power_state().await.unwrap_err();
    assert!(matches!(err, SdcpError::Connection(_)));
}

// ── Discovery ────────────────────────────────────────────────────

/// Reserve a UDP port on loopback, then release it for `discover`.
async fn free_udp_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap().port()
}

#[tokio::test]
async fn discovery_parses_and_dedups_announcements() {
    let port = free_udp_port().await;
    let config = DiscoveryConfig {
        bind_address: "127.0.0.1".parse().unwrap(),
        port,
        window: Duration::from_millis(300),
    };

    let announcer = tokio::spawn(async move {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = format!("127.0.0.1:{port}");

        let announcement = DeviceDescriptor {
            version: 2,
            category: 10,
            community: Community::default(),
            device_id: "PJ".into(),
            product_name: "VPL-VW320".into(),
            serial_number: 7777,
            power_state: 3,
            location: "living room".into(),
            address: "127.0.0.1".parse().unwrap(),
        }
        .to_announcement();

        tokio::time::sleep(Duration::from_millis(50)).await;
        // Same device announcing twice, plus line noise.
        socket.send_to(&announcement, &target).await.unwrap();
        socket.send_to(&announcement, &target).await.unwrap();
        socket.send_to(&[0x00, 0x01, 0x02], &target).await.unwrap();
    });

    let devices = discover(&config).await.unwrap();
    announcer.await.unwrap();

    assert_eq!(devices.len(), 1);
    let device = &devices[0];
    assert_eq!(device.serial_number, 7777);
    assert_eq!(device.product_name, "VPL-VW320");
    assert_eq!(device.location, "living room");
    assert_eq!(device.power_state, 3);
    assert_eq!(device.address, "127.0.0.1".parse::<std::net::IpAddr>().unwrap());
}

#[tokio::test]
async fn discovery_hearing_nothing_returns_empty() {
    let port = free_udp_port().await;
    let config = DiscoveryConfig {
        bind_address: "127.0.0.1".parse().unwrap(),
        port,
        window: Duration::from_millis(100),
    };

    let devices = discover(&config).await.unwrap();
    assert!(devices.is_empty());
}
