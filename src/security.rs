//! Security model identifiers, levels and the model registry.
//!
//! Message processing models never perform cryptographic work themselves.
//! They look up the handler for their security model in a
//! [`SecurityModels`] registry that is injected at construction, and record
//! it in the [`StateReference`](crate::mp::StateReference) of each inbound
//! message.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Numeric security model identifier (RFC 3411 SnmpSecurityModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecurityModelId(pub i32);

impl SecurityModelId {
    /// Any security model.
    pub const ANY: Self = Self(0);
    /// Community-based SNMPv1.
    pub const SNMPV1: Self = Self(1);
    /// Community-based SNMPv2c.
    pub const SNMPV2C: Self = Self(2);
    /// User-based security model (SNMPv3).
    pub const USM: Self = Self(3);
    /// Transport security model (RFC 5591).
    pub const TSM: Self = Self(4);

    /// Raw identifier.
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SecurityModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ANY => write!(f, "any"),
            Self::SNMPV1 => write!(f, "SNMPv1"),
            Self::SNMPV2C => write!(f, "SNMPv2c"),
            Self::USM => write!(f, "USM"),
            Self::TSM => write!(f, "TSM"),
            Self(other) => write!(f, "securityModel({})", other),
        }
    }
}

/// Security level (RFC 3411 SnmpSecurityLevel).
///
/// Ordered from least to most protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SecurityLevel {
    /// No authentication, no privacy.
    #[default]
    NoAuthNoPriv,
    /// Authentication only.
    AuthNoPriv,
    /// Authentication and privacy (encryption).
    AuthPriv,
}

impl SecurityLevel {
    /// RFC 3411 numeric value (1..=3).
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::NoAuthNoPriv => 1,
            Self::AuthNoPriv => 2,
            Self::AuthPriv => 3,
        }
    }

    /// Create from the RFC 3411 numeric value.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::NoAuthNoPriv),
            2 => Some(Self::AuthNoPriv),
            3 => Some(Self::AuthPriv),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAuthNoPriv => write!(f, "noAuthNoPriv"),
            Self::AuthNoPriv => write!(f, "authNoPriv"),
            Self::AuthPriv => write!(f, "authPriv"),
        }
    }
}

/// A pluggable security model handler.
///
/// Only identification is needed at the message processing layer.
pub trait SecurityModel: Send + Sync + fmt::Debug {
    /// The model's numeric identifier.
    fn id(&self) -> SecurityModelId;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str;
}

/// Community-based security (SNMPv1 and SNMPv2c).
///
/// The community string is carried in the clear and checked by the
/// application, so this handler holds no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunitySecurityModel {
    id: SecurityModelId,
}

impl CommunitySecurityModel {
    /// SNMPv1 community security.
    pub const fn v1() -> Self {
        Self {
            id: SecurityModelId::SNMPV1,
        }
    }

    /// SNMPv2c community security.
    pub const fn v2c() -> Self {
        Self {
            id: SecurityModelId::SNMPV2C,
        }
    }
}

impl SecurityModel for CommunitySecurityModel {
    fn id(&self) -> SecurityModelId {
        self.id
    }

    fn name(&self) -> &'static str {
        if self.id == SecurityModelId::SNMPV1 {
            "SNMPv1 community"
        } else {
            "SNMPv2c community"
        }
    }
}

/// Registry mapping security model IDs to handlers.
///
/// Read-only once built; share it behind an `Arc`.
///
/// ```
/// use std::sync::Arc;
/// use snmp_mp::security::{SecurityModelId, SecurityModels};
///
/// let registry = Arc::new(SecurityModels::community());
/// assert!(registry.contains(SecurityModelId::SNMPV2C));
/// assert!(registry.get(SecurityModelId::USM).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SecurityModels {
    models: HashMap<SecurityModelId, Arc<dyn SecurityModel>>,
}

impl SecurityModels {
    /// Create a builder.
    pub fn builder() -> SecurityModelsBuilder {
        SecurityModelsBuilder::default()
    }

    /// Registry with both community-based models.
    pub fn community() -> Self {
        Self::builder()
            .add(CommunitySecurityModel::v1())
            .add(CommunitySecurityModel::v2c())
            .build()
    }

    /// Look up a handler by ID.
    pub fn get(&self, id: SecurityModelId) -> Option<Arc<dyn SecurityModel>> {
        self.models.get(&id).cloned()
    }

    /// Whether a handler is registered for this ID.
    pub fn contains(&self, id: SecurityModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Builder for [`SecurityModels`].
#[derive(Debug, Default)]
pub struct SecurityModelsBuilder {
    models: HashMap<SecurityModelId, Arc<dyn SecurityModel>>,
}

impl SecurityModelsBuilder {
    /// Register a handler. A later handler with the same ID replaces an earlier one.
    pub fn add(self, model: impl SecurityModel + 'static) -> Self {
        self.add_shared(Arc::new(model))
    }

    /// Register an already shared handler.
    pub fn add_shared(mut self, model: Arc<dyn SecurityModel>) -> Self {
        self.models.insert(model.id(), model);
        self
    }

    /// Build the registry.
    pub fn build(self) -> SecurityModels {
        SecurityModels {
            models: self.models,
        }
    }
}
