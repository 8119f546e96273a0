use crate::segment::ParamType;
use thiserror::Error;

/// Errors raised while registering a route template.
///
/// These surface at startup, from the registration call that introduced the
/// bad template. A template that fails to parse is never registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid route type '{type_name}' in template '{template}'")]
    InvalidRouteType { template: String, type_name: String },

    #[error("invalid segment '{segment}' in template '{template}'")]
    InvalidSegment { template: String, segment: String },

    #[error("default value '{value}' of parameter '{name}' in template '{template}' is not a valid {param_type}")]
    InvalidDefault { template: String, name: String, value: String, param_type: ParamType },

    #[error("parameter '{name}' declared more than once in template '{template}'")]
    DuplicateParameter { template: String, name: String },

    #[error("invalid router config: {reason}")]
    InvalidConfig { reason: String },
}

impl RouteError {
    pub fn invalid_route_type<T: ToString, S: ToString>(template: T, type_name: S) -> Self {
        Self::InvalidRouteType { template: template.to_string(), type_name: type_name.to_string() }
    }

    pub fn invalid_segment<T: ToString, S: ToString>(template: T, segment: S) -> Self {
        Self::InvalidSegment { template: template.to_string(), segment: segment.to_string() }
    }

    pub fn invalid_default<T: ToString, N: ToString, V: ToString>(
        template: T,
        name: N,
        value: V,
        param_type: ParamType,
    ) -> Self {
        Self::InvalidDefault {
            template: template.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            param_type,
        }
    }

    pub fn duplicate_parameter<T: ToString, N: ToString>(template: T, name: N) -> Self {
        Self::DuplicateParameter { template: template.to_string(), name: name.to_string() }
    }

    pub fn invalid_config<S: ToString>(reason: S) -> Self {
        Self::InvalidConfig { reason: reason.to_string() }
    }
}

/// Errors scoped to a single dispatch.
///
/// A failed dispatch leaves the router untouched, other requests are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("route '{template}' matched but handler parameter '{name}' has no value")]
    MissingRouteParameter { template: String, name: String },
}

impl DispatchError {
    pub fn missing_route_parameter<T: ToString, N: ToString>(template: T, name: N) -> Self {
        Self::MissingRouteParameter { template: template.to_string(), name: name.to_string() }
    }
}
