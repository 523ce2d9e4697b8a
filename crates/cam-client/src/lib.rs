//! Clean Access Manager API Client
//!
//! A Rust client library for the Clean Access Manager (CAM) HTTP management
//! API. Requests are form-encoded POSTs; the appliance answers with an HTML
//! table whose rows are decoded into name-keyed [`Row`]s and then parsed into
//! typed models.
//!
//! # Example
//!
//! ```no_run
//! use cam_client::{CamClient, FilterAccess, MacFilter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CamClient::connect("https://cam.example.com", "admin", "cisco123")?;
//!
//! println!("CAM version {}", client.get_cam_version()?);
//!
//! let mut filter = MacFilter::new("00:16:17:18:19:1A");
//! filter.access = Some(FilterAccess::UseRole { role: "Printers".to_string() });
//! filter.description = Some("Lobby printer".to_string());
//! client.add_mac_address(filter)?;
//!
//! if let Some(device) = client.check_mac_address("00:16:17:18:19:1A", None)? {
//!     println!("{} -> {}", device.mac_address, device.filter_type);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Content types**: `type/subtype; charset=X` parsing with a Latin-1 default
//! - **Payload decoding**: charset-aware HTML table decoding into rows
//! - **Device filters**: add, check, list and remove MAC and subnet filters
//! - **Users**: local accounts, roles, kicks and session renewal
//! - **Testing**: `MockCamConnection` behind the `test-util` feature

pub mod client;
pub mod config;
pub mod connection;
pub mod content_type;
pub mod decoder;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod models;
pub mod parser;
pub mod request;
pub mod response;

pub use client::CamClient;
pub use config::CamConfig;
pub use connection::{CamConnection, EncodedRequest, HttpCamConnection};
pub use content_type::ContentType;
pub use decoder::decode_payload;
pub use error::{CamError, ConnectionError, DecodeError, InvalidArgument, ParseError};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockCamConnection;
pub use models::*;
pub use parser::{parse_device, parse_device_list, parse_local_user, parse_local_user_list};
pub use request::{CamRequest, LocalUserQuery, MacFilter, Operation, RequestParameter, SubnetFilter};
pub use response::{CamResponse, Row};
