//! CAM API requests
//!
//! Every appliance operation is one [`CamRequest`] variant carrying exactly
//! the fields that operation accepts. [`CamRequest::parameters`] flattens a
//! variant into the ordered `(parameter, value)` list that goes on the wire.

use crate::error::InvalidArgument;
use crate::models::FilterAccess;
use std::fmt;

/// Operation identifiers understood by the appliance (`op=` form field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddCleanMacAddress,
    AddLocalUser,
    AddMacAddress,
    AddSubnet,
    BouncePort,
    BouncePortByMacAddress,
    ChangeLoggedInUserRole,
    ChangeUserRole,
    CheckMacAddress,
    ClearCertifiedList,
    DeleteLocalUser,
    GetLocalUserList,
    GetMacAddressList,
    GetVersion,
    KickOutOfBandUser,
    KickUser,
    KickUserByMacAddress,
    RemoveCleanMacAddress,
    RemoveMacAddress,
    RemoveMacAddressList,
    RemoveSubnet,
    RenewUserSessionTime,
    UpdateSubnet,
}

impl Operation {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddCleanMacAddress => "addcleanmac",
            Operation::AddLocalUser => "addlocaluser",
            Operation::AddMacAddress => "addmac",
            Operation::AddSubnet => "addsubnet",
            Operation::BouncePort => "bounceport",
            Operation::BouncePortByMacAddress => "bounceportbymac",
            Operation::ChangeLoggedInUserRole => "changeloggedinuserrole",
            Operation::ChangeUserRole => "changeuserrole",
            Operation::CheckMacAddress => "checkmac",
            Operation::ClearCertifiedList => "clearcertified",
            Operation::DeleteLocalUser => "deletelocaluser",
            Operation::GetLocalUserList => "getlocaluserlist",
            Operation::GetMacAddressList => "getmaclist",
            Operation::GetVersion => "getversion",
            Operation::KickOutOfBandUser => "kickoobuser",
            Operation::KickUser => "kickuser",
            Operation::KickUserByMacAddress => "kickuserbymac",
            Operation::RemoveCleanMacAddress => "removecleanmac",
            Operation::RemoveMacAddress => "removemac",
            Operation::RemoveMacAddressList => "removemaclist",
            Operation::RemoveSubnet => "removesubnet",
            Operation::RenewUserSessionTime => "renewsessiontime",
            Operation::UpdateSubnet => "updatesubnet",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form field names the appliance accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestParameter {
    Description,
    IpAddress,
    List,
    MacAddress,
    QueryType,
    QueryValue,
    RoleName,
    ServerIpAddress,
    Subnet,
    SubnetMask,
    SwitchId,
    SwitchPort,
    Type,
    UserPassword,
    Username,
}

impl RequestParameter {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestParameter::Description => "desc",
            RequestParameter::IpAddress => "ip",
            RequestParameter::List => "list",
            RequestParameter::MacAddress => "mac",
            RequestParameter::QueryType => "qtype",
            RequestParameter::QueryValue => "qvalue",
            RequestParameter::RoleName => "role",
            RequestParameter::ServerIpAddress => "ssip",
            RequestParameter::Subnet => "subnet",
            RequestParameter::SubnetMask => "mask",
            RequestParameter::SwitchId => "switchid",
            RequestParameter::SwitchPort => "port",
            RequestParameter::Type => "type",
            RequestParameter::UserPassword => "userpass",
            RequestParameter::Username => "username",
        }
    }
}

impl fmt::Display for RequestParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which local users a delete applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalUserQuery {
    All,
    Name(String),
}

/// A new Device Filters entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacFilter {
    pub mac_address: String,
    pub ip_address: Option<String>,
    pub access: Option<FilterAccess>,
    pub description: Option<String>,
    pub server_ip: Option<String>,
}

impl MacFilter {
    /// A filter with only the MAC address set
    pub fn new(mac_address: impl Into<String>) -> Self {
        Self {
            mac_address: mac_address.into(),
            ip_address: None,
            access: None,
            description: None,
            server_ip: None,
        }
    }
}

/// A subnet filter entry, used for both add and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetFilter {
    pub subnet: String,
    pub mask: String,
    pub access: Option<FilterAccess>,
    pub description: Option<String>,
    pub server_ip: Option<String>,
}

impl SubnetFilter {
    /// A filter with only the subnet and mask set
    pub fn new(subnet: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            subnet: subnet.into(),
            mask: mask.into(),
            access: None,
            description: None,
            server_ip: None,
        }
    }
}

/// A request to the appliance, one variant per operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CamRequest {
    AddCleanMacAddress { mac_address: String, server_ip: Option<String> },
    AddLocalUser { username: String, password: String, role: String },
    AddMacAddress(MacFilter),
    AddSubnet(SubnetFilter),
    BouncePort { switch_id: String, port: u32 },
    BouncePortByMacAddress { mac_address: String },
    ChangeLoggedInUserRole { ip_address: String, role: String },
    ChangeUserRole { ip_address: String, role: String },
    CheckMacAddress { mac_address: String, server_ip: Option<String> },
    ClearCertifiedList,
    DeleteLocalUser(LocalUserQuery),
    GetLocalUserList,
    GetMacAddressList,
    GetVersion,
    KickOutOfBandUser { mac_address: String },
    KickUser { ip_address: String },
    KickUserByMacAddress { mac_address: String },
    RemoveCleanMacAddress { mac_address: String, server_ip: Option<String> },
    RemoveMacAddress { mac_address: String, server_ip: Option<String> },
    RemoveMacAddressList,
    RemoveSubnet { subnet: String, mask: String, server_ip: Option<String> },
    RenewUserSessionTime { ip_address: String },
    UpdateSubnet(SubnetFilter),
}

/// Accumulates wire parameters, dropping absent or empty optionals
#[derive(Default)]
struct Params(Vec<(RequestParameter, String)>);

impl Params {
    fn required(mut self, name: RequestParameter, value: &str) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    fn optional(self, name: RequestParameter, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.required(name, value),
            None => self,
        }
    }
}

impl CamRequest {
    /// The operation this request invokes
    pub fn operation(&self) -> Operation {
        match self {
            CamRequest::AddCleanMacAddress { .. } => Operation::AddCleanMacAddress,
            CamRequest::AddLocalUser { .. } => Operation::AddLocalUser,
            CamRequest::AddMacAddress(_) => Operation::AddMacAddress,
            CamRequest::AddSubnet(_) => Operation::AddSubnet,
            CamRequest::BouncePort { .. } => Operation::BouncePort,
            CamRequest::BouncePortByMacAddress { .. } => Operation::BouncePortByMacAddress,
            CamRequest::ChangeLoggedInUserRole { .. } => Operation::ChangeLoggedInUserRole,
            CamRequest::ChangeUserRole { .. } => Operation::ChangeUserRole,
            CamRequest::CheckMacAddress { .. } => Operation::CheckMacAddress,
            CamRequest::ClearCertifiedList => Operation::ClearCertifiedList,
            CamRequest::DeleteLocalUser(_) => Operation::DeleteLocalUser,
            CamRequest::GetLocalUserList => Operation::GetLocalUserList,
            CamRequest::GetMacAddressList => Operation::GetMacAddressList,
            CamRequest::GetVersion => Operation::GetVersion,
            CamRequest::KickOutOfBandUser { .. } => Operation::KickOutOfBandUser,
            CamRequest::KickUser { .. } => Operation::KickUser,
            CamRequest::KickUserByMacAddress { .. } => Operation::KickUserByMacAddress,
            CamRequest::RemoveCleanMacAddress { .. } => Operation::RemoveCleanMacAddress,
            CamRequest::RemoveMacAddress { .. } => Operation::RemoveMacAddress,
            CamRequest::RemoveMacAddressList => Operation::RemoveMacAddressList,
            CamRequest::RemoveSubnet { .. } => Operation::RemoveSubnet,
            CamRequest::RenewUserSessionTime { .. } => Operation::RenewUserSessionTime,
            CamRequest::UpdateSubnet(_) => Operation::UpdateSubnet,
        }
    }

    /// Wire parameters in the order the appliance expects them
    pub fn parameters(&self) -> Vec<(RequestParameter, String)> {
        use RequestParameter as P;

        let params = Params::default();
        let params = match self {
            CamRequest::AddCleanMacAddress { mac_address, server_ip }
            | CamRequest::CheckMacAddress { mac_address, server_ip }
            | CamRequest::RemoveCleanMacAddress { mac_address, server_ip }
            | CamRequest::RemoveMacAddress { mac_address, server_ip } => params
                .required(P::MacAddress, mac_address)
                .optional(P::ServerIpAddress, server_ip.as_deref()),
            CamRequest::AddLocalUser { username, password, role } => params
                .required(P::Username, username)
                .required(P::UserPassword, password)
                .required(P::RoleName, role),
            CamRequest::AddMacAddress(filter) => {
                let filter_type = filter.access.as_ref().map(FilterAccess::filter_type);
                params
                    .required(P::MacAddress, &filter.mac_address)
                    .optional(P::IpAddress, filter.ip_address.as_deref())
                    .optional(P::Type, filter_type.map(|t| t.as_str()))
                    .optional(P::RoleName, filter.access.as_ref().and_then(FilterAccess::role))
                    .optional(P::Description, filter.description.as_deref())
                    .optional(P::ServerIpAddress, filter.server_ip.as_deref())
            }
            CamRequest::AddSubnet(filter) | CamRequest::UpdateSubnet(filter) => {
                let filter_type = filter.access.as_ref().map(FilterAccess::filter_type);
                // Subnets only take a role for the userole rule
                let role = match &filter.access {
                    Some(FilterAccess::UseRole { role }) => Some(role.as_str()),
                    _ => None,
                };
                params
                    .required(P::Subnet, &filter.subnet)
                    .required(P::SubnetMask, &filter.mask)
                    .optional(P::Type, filter_type.map(|t| t.as_str()))
                    .optional(P::RoleName, role)
                    .optional(P::Description, filter.description.as_deref())
                    .optional(P::ServerIpAddress, filter.server_ip.as_deref())
            }
            CamRequest::BouncePort { switch_id, port } => params
                .required(P::SwitchId, switch_id)
                .required(P::SwitchPort, &port.to_string()),
            CamRequest::BouncePortByMacAddress { mac_address }
            | CamRequest::KickOutOfBandUser { mac_address }
            | CamRequest::KickUserByMacAddress { mac_address } => {
                params.required(P::MacAddress, mac_address)
            }
            CamRequest::ChangeLoggedInUserRole { ip_address, role }
            | CamRequest::ChangeUserRole { ip_address, role } => params
                .required(P::IpAddress, ip_address)
                .required(P::RoleName, role),
            CamRequest::DeleteLocalUser(LocalUserQuery::All) => params
                .required(P::QueryType, "all")
                .required(P::QueryValue, ""),
            CamRequest::DeleteLocalUser(LocalUserQuery::Name(username)) => params
                .required(P::QueryType, "name")
                .required(P::QueryValue, username),
            CamRequest::KickUser { ip_address } => params.required(P::IpAddress, ip_address),
            CamRequest::RemoveSubnet { subnet, mask, server_ip } => params
                .required(P::Subnet, subnet)
                .required(P::SubnetMask, mask)
                .optional(P::ServerIpAddress, server_ip.as_deref()),
            CamRequest::RenewUserSessionTime { ip_address } => params.required(P::List, ip_address),
            CamRequest::ClearCertifiedList
            | CamRequest::GetLocalUserList
            | CamRequest::GetMacAddressList
            | CamRequest::GetVersion
            | CamRequest::RemoveMacAddressList => params,
        };
        params.0
    }

    /// Reject requests whose required fields are empty
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        let required: Vec<(&'static str, &str)> = match self {
            CamRequest::AddCleanMacAddress { mac_address, .. }
            | CamRequest::BouncePortByMacAddress { mac_address }
            | CamRequest::CheckMacAddress { mac_address, .. }
            | CamRequest::KickOutOfBandUser { mac_address }
            | CamRequest::KickUserByMacAddress { mac_address }
            | CamRequest::RemoveCleanMacAddress { mac_address, .. }
            | CamRequest::RemoveMacAddress { mac_address, .. } => vec![("MAC address", mac_address.as_str())],
            CamRequest::AddMacAddress(filter) => {
                let mut fields = vec![("MAC address", filter.mac_address.as_str())];
                if let Some(FilterAccess::UseRole { role }) = &filter.access {
                    fields.push(("Role", role.as_str()));
                }
                fields
            }
            CamRequest::AddLocalUser { username, password, role } => {
                vec![
                    ("Username", username.as_str()),
                    ("Password", password.as_str()),
                    ("Role", role.as_str()),
                ]
            }
            CamRequest::AddSubnet(filter) | CamRequest::UpdateSubnet(filter) => {
                let mut fields = vec![("Subnet", filter.subnet.as_str()), ("Mask", filter.mask.as_str())];
                if let Some(FilterAccess::UseRole { role }) = &filter.access {
                    fields.push(("Role", role.as_str()));
                }
                fields
            }
            CamRequest::RemoveSubnet { subnet, mask, .. } => {
                vec![("Subnet", subnet.as_str()), ("Mask", mask.as_str())]
            }
            CamRequest::BouncePort { switch_id, .. } => vec![("Switch ID", switch_id.as_str())],
            CamRequest::ChangeLoggedInUserRole { ip_address, role }
            | CamRequest::ChangeUserRole { ip_address, role } => {
                vec![("IP address", ip_address.as_str()), ("Role", role.as_str())]
            }
            CamRequest::DeleteLocalUser(LocalUserQuery::Name(username)) => {
                vec![("Username", username.as_str())]
            }
            CamRequest::KickUser { ip_address } | CamRequest::RenewUserSessionTime { ip_address } => {
                vec![("IP address", ip_address.as_str())]
            }
            CamRequest::ClearCertifiedList
            | CamRequest::DeleteLocalUser(LocalUserQuery::All)
            | CamRequest::GetLocalUserList
            | CamRequest::GetMacAddressList
            | CamRequest::GetVersion
            | CamRequest::RemoveMacAddressList => Vec::new(),
        };

        match required.into_iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(InvalidArgument::new(format!("{field} cannot be empty"))),
            None => Ok(()),
        }
    }
}
