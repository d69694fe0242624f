use std::net::{IpAddr, UdpSocket};

use garagepi_api::{EndpointInfo, ServiceInfo, SystemStatus};
use sysinfo::System;
use time::OffsetDateTime;

use crate::configs::Server;

const ENDPOINTS: [(&str, &str); 3] = [
    ("air", "Garage air temperature and humidity."),
    ("door", "Garage door status."),
    ("trigger", "Trigger the garage door button."),
];

/// Static process metadata for the root endpoint.
pub struct InfoService {
    boot_status: SystemStatus,
    port: u16,
    host: String,
}

impl InfoService {
    pub fn new(server: &Server) -> Self {
        Self {
            boot_status: system_status(),
            port: server.port,
            host: server.host.clone(),
        }
    }

    pub fn info(&self) -> ServiceInfo {
        let current_status = system_status();
        let host = current_status.ip.clone().unwrap_or_else(|| self.host.clone());

        let api = ENDPOINTS
            .iter()
            .map(|(name, description)| EndpointInfo {
                name: name.to_string(),
                path: format!("http://{}:{}/{}", host, self.port, name),
                description: description.to_string(),
            })
            .collect();

        ServiceInfo {
            boot_status: self.boot_status.clone(),
            current_status,
            api,
        }
    }
}

fn system_status() -> SystemStatus {
    let (load, uptime) = if sysinfo::IS_SUPPORTED_SYSTEM {
        let load = System::load_average();
        (Some([load.one, load.five, load.fifteen]), Some(System::uptime()))
    } else {
        (None, None)
    };

    SystemStatus {
        date: OffsetDateTime::now_utc(),
        ip: local_ip().map(|ip| ip.to_string()),
        load,
        uptime,
    }
}

/// Address of the interface that routes outward. Connecting a UDP socket sends nothing.
fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("10.254.254.254:1").ok()?;

    socket.local_addr().ok().map(|addr| addr.ip())
}
