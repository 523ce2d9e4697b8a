//! CAM API client
//!
//! One method per appliance operation. Each builds a [`CamRequest`], submits
//! it over the configured [`CamConnection`], turns an appliance-reported
//! failure into [`CamError::Api`] and parses the rows it needs.

use crate::config::CamConfig;
use crate::connection::{CamConnection, HttpCamConnection};
use crate::error::{CamError, ParseError};
use crate::models::{CamDevice, CamLocalUser};
use crate::parser;
use crate::request::{CamRequest, LocalUserQuery, MacFilter, SubnetFilter};
use crate::response::CamResponse;
use tracing::{debug, warn};

/// CAM API client
#[derive(Debug)]
pub struct CamClient<C = HttpCamConnection> {
    conn: C,
}

impl CamClient<HttpCamConnection> {
    /// Connect to an appliance over HTTP(S)
    ///
    /// # Arguments
    /// * `base_url` - Appliance base URL (e.g., "https://cam.example.com")
    /// * `username` - API administrator name
    /// * `password` - API administrator password
    pub fn connect(base_url: &str, username: &str, password: &str) -> Result<Self, CamError> {
        Ok(Self::new(HttpCamConnection::new(base_url, username, password)?))
    }

    /// Connect using loaded configuration
    pub fn from_config(config: &CamConfig) -> Result<Self, CamError> {
        Ok(Self::new(HttpCamConnection::from_config(config)?))
    }
}

impl<C: CamConnection> CamClient<C> {
    /// Wrap an existing connection
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// The underlying connection
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// The User-Agent sent with every request
    pub fn user_agent(&self) -> &str {
        self.conn.user_agent()
    }

    /// Set the User-Agent sent with every request
    pub fn set_user_agent(&mut self, user_agent: &str) -> Result<(), CamError> {
        Ok(self.conn.set_user_agent(user_agent)?)
    }

    fn submit(&self, request: CamRequest, context: &'static str) -> Result<CamResponse, CamError> {
        request.validate()?;
        debug!("Submitting {} request", request.operation());

        let response = self.conn.submit_request(&request)?;
        if response.is_error() {
            let message = response.error_text().unwrap_or("unknown error").to_string();
            warn!("Appliance rejected {}: {}", request.operation(), message);
            return Err(CamError::Api { context, message });
        }
        Ok(response)
    }

    /// Add a MAC address to the Certified Devices list as an exempted device
    ///
    /// # Arguments
    /// * `mac_address` - Format `01:23:45:67:89:AB`
    /// * `server_ip` - Optional Clean Access Server IP address
    pub fn add_clean_mac_address(&self, mac_address: &str, server_ip: Option<&str>) -> Result<(), CamError> {
        let request = CamRequest::AddCleanMacAddress {
            mac_address: mac_address.to_string(),
            server_ip: server_ip.map(str::to_string),
        };
        self.submit(request, "Error adding clean MAC address")?;
        Ok(())
    }

    /// Add a local user account
    pub fn add_local_user(&self, username: &str, password: &str, role: &str) -> Result<(), CamError> {
        let request = CamRequest::AddLocalUser {
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };
        self.submit(request, "Error adding local user")?;
        Ok(())
    }

    /// Add an entry to the Device Filters list
    pub fn add_mac_address(&self, filter: MacFilter) -> Result<(), CamError> {
        self.submit(CamRequest::AddMacAddress(filter), "Error adding MAC address")?;
        Ok(())
    }

    /// Add an entry to the Subnet Filters list
    pub fn add_subnet(&self, filter: SubnetFilter) -> Result<(), CamError> {
        self.submit(CamRequest::AddSubnet(filter), "Error adding subnet")?;
        Ok(())
    }

    /// Bounce an out-of-band switch port
    ///
    /// # Arguments
    /// * `switch_id` - Switch ID as stored in the switches table
    /// * `port` - Port number on that switch
    pub fn bounce_port(&self, switch_id: &str, port: u32) -> Result<(), CamError> {
        let request = CamRequest::BouncePort {
            switch_id: switch_id.to_string(),
            port,
        };
        self.submit(request, "Error bouncing port")?;
        Ok(())
    }

    /// Bounce the out-of-band port the given MAC address is connected to
    pub fn bounce_port_by_mac_address(&self, mac_address: &str) -> Result<(), CamError> {
        let request = CamRequest::BouncePortByMacAddress {
            mac_address: mac_address.to_string(),
        };
        self.submit(request, "Error bouncing port by MAC address")?;
        Ok(())
    }

    /// Move the online user at `ip_address` to another role
    pub fn change_logged_in_user_role(&self, ip_address: &str, role: &str) -> Result<(), CamError> {
        let request = CamRequest::ChangeLoggedInUserRole {
            ip_address: ip_address.to_string(),
            role: role.to_string(),
        };
        self.submit(request, "Error changing logged in user role")?;
        Ok(())
    }

    /// Change the role of the user at `ip_address`
    pub fn change_user_role(&self, ip_address: &str, role: &str) -> Result<(), CamError> {
        let request = CamRequest::ChangeUserRole {
            ip_address: ip_address.to_string(),
            role: role.to_string(),
        };
        self.submit(request, "Error changing user role")?;
        Ok(())
    }

    /// Look a MAC address up in the Device Filters list
    ///
    /// # Returns
    /// * `Ok(Some(CamDevice))` - The filter entry for the address
    /// * `Ok(None)` - The address is not in the list
    /// * `Err(CamError)` - If the request fails
    pub fn check_mac_address(&self, mac_address: &str, server_ip: Option<&str>) -> Result<Option<CamDevice>, CamError> {
        let request = CamRequest::CheckMacAddress {
            mac_address: mac_address.to_string(),
            server_ip: server_ip.map(str::to_string),
        };
        let response = self.submit(request, "Error checking MAC address")?;
        let rows = response.rows();
        if !parser::parse_found_flag(rows) {
            return Ok(None);
        }
        let row = rows.get(1).ok_or(ParseError::MissingRow(1))?;
        Ok(Some(parser::parse_device(row)?))
    }

    /// Delete every entry in the Certified Devices list
    pub fn clear_certified_list(&self) -> Result<(), CamError> {
        self.submit(CamRequest::ClearCertifiedList, "Error clearing certified list")?;
        Ok(())
    }

    /// Delete every local user account
    pub fn delete_all_local_users(&self) -> Result<(), CamError> {
        self.submit(
            CamRequest::DeleteLocalUser(LocalUserQuery::All),
            "Error deleting all local users",
        )?;
        Ok(())
    }

    /// Delete one local user account by name
    pub fn delete_local_user(&self, username: &str) -> Result<(), CamError> {
        self.submit(
            CamRequest::DeleteLocalUser(LocalUserQuery::Name(username.to_string())),
            "Error deleting local user",
        )?;
        Ok(())
    }

    /// Get the appliance software version
    pub fn get_cam_version(&self) -> Result<String, CamError> {
        let response = self.submit(CamRequest::GetVersion, "Error getting version")?;
        Ok(parser::parse_version(response.rows())?)
    }

    /// List the local user accounts
    pub fn get_local_user_list(&self) -> Result<Vec<CamLocalUser>, CamError> {
        let response = self.submit(CamRequest::GetLocalUserList, "Error retrieving local user list")?;
        Ok(parser::parse_local_user_list(response.rows())?)
    }

    /// Retrieve the entire Device Filters list
    pub fn get_mac_address_list(&self) -> Result<Vec<CamDevice>, CamError> {
        let response = self.submit(CamRequest::GetMacAddressList, "Error getting MAC address list")?;
        Ok(parser::parse_device_list(response.rows())?)
    }

    /// End the session of an out-of-band user and drop them from the online list
    pub fn kick_out_of_band_user(&self, mac_address: &str) -> Result<(), CamError> {
        let request = CamRequest::KickOutOfBandUser {
            mac_address: mac_address.to_string(),
        };
        self.submit(request, "Error kicking out-of-band user")?;
        Ok(())
    }

    /// Log out the in-band user at `ip_address`
    pub fn kick_user(&self, ip_address: &str) -> Result<(), CamError> {
        let request = CamRequest::KickUser {
            ip_address: ip_address.to_string(),
        };
        self.submit(request, "Error kicking user")?;
        Ok(())
    }

    /// Log out the in-band user with the given MAC address
    pub fn kick_user_by_mac_address(&self, mac_address: &str) -> Result<(), CamError> {
        let request = CamRequest::KickUserByMacAddress {
            mac_address: mac_address.to_string(),
        };
        self.submit(request, "Error kicking user by MAC address")?;
        Ok(())
    }

    /// Remove a MAC address from the Certified Devices list
    pub fn remove_clean_mac_address(&self, mac_address: &str, server_ip: Option<&str>) -> Result<(), CamError> {
        let request = CamRequest::RemoveCleanMacAddress {
            mac_address: mac_address.to_string(),
            server_ip: server_ip.map(str::to_string),
        };
        self.submit(request, "Error removing clean MAC address")?;
        Ok(())
    }

    /// Remove a MAC address from the Device Filters list
    pub fn remove_mac_address(&self, mac_address: &str, server_ip: Option<&str>) -> Result<(), CamError> {
        let request = CamRequest::RemoveMacAddress {
            mac_address: mac_address.to_string(),
            server_ip: server_ip.map(str::to_string),
        };
        self.submit(request, "Error removing MAC address")?;
        Ok(())
    }

    /// Delete every entry in the Device Filters list
    pub fn remove_mac_address_list(&self) -> Result<(), CamError> {
        self.submit(CamRequest::RemoveMacAddressList, "Error removing MAC address list")?;
        Ok(())
    }

    /// Remove an entry from the Subnet Filters list
    pub fn remove_subnet(&self, subnet: &str, mask: &str, server_ip: Option<&str>) -> Result<(), CamError> {
        let request = CamRequest::RemoveSubnet {
            subnet: subnet.to_string(),
            mask: mask.to_string(),
            server_ip: server_ip.map(str::to_string),
        };
        self.submit(request, "Error removing subnet")?;
        Ok(())
    }

    /// Extend the session of the user at `ip_address` by one session length
    pub fn renew_user_session_time(&self, ip_address: &str) -> Result<(), CamError> {
        let request = CamRequest::RenewUserSessionTime {
            ip_address: ip_address.to_string(),
        };
        self.submit(request, "Error renewing user session time")?;
        Ok(())
    }

    /// Replace the access rule of an existing subnet filter
    pub fn update_subnet(&self, filter: SubnetFilter) -> Result<(), CamError> {
        self.submit(CamRequest::UpdateSubnet(filter), "Error updating subnet")?;
        Ok(())
    }
}
