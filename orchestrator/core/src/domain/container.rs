// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Container Spec
//!
//! A single runnable unit inside a pod template, plus the value objects it is
//! configured with (ports, environment, resources, probes, mounts).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Container builder with per-setter validation
//!
//! Value objects (`ContainerPort`, `EnvVar`, `Probe`, ...) are plain structs
//! with public fields. They are checked when handed to a `Container` setter,
//! and a rejected value never reaches the container.

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::primitives::{
    is_false, one_of, parse_enum, require_non_empty, require_positive, IntOrString, Protocol,
    Quantity,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Value objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImagePullPolicy {
    Always,
    Never,
    IfNotPresent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub container_port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "hostIP")]
    pub host_ip: Option<String>,
}

impl ContainerPort {
    pub fn tcp(container_port: i32) -> Self {
        Self {
            container_port,
            protocol: Some(Protocol::Tcp),
            ..Self::default()
        }
    }

    fn validate(&self) -> ValidationResult {
        if *self == Self::default() {
            return Err(ValidationError::Empty { field: "container port" });
        }
        validate_port_number("containerPort", self.container_port)?;
        if let Some(host_port) = self.host_port {
            validate_port_number("hostPort", host_port)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_port_number(field: &'static str, port: i32) -> ValidationResult {
    if !(1..=65535).contains(&port) {
        return Err(ValidationError::invalid(
            field,
            format!("{port} is outside 1-65535"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "one_of")]
    pub value_from: Option<EnvVarSource>,
}

impl EnvVar {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            value_from: None,
        }
    }

    pub fn from_source(name: impl Into<String>, source: EnvVarSource) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(source),
        }
    }

    pub(crate) fn validate(&self) -> ValidationResult {
        if *self == Self::default() {
            return Err(ValidationError::Empty { field: "env" });
        }
        require_non_empty("env name", &self.name)?;
        if self.value.is_some() && self.value_from.is_some() {
            return Err(ValidationError::invalid(
                "env",
                format!("'{}' sets both value and valueFrom", self.name),
            ));
        }
        if let Some(source) = &self.value_from {
            source.validate()?;
        }
        Ok(())
    }
}

/// Where an environment value is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvVarSource {
    FieldRef(ObjectFieldSelector),
    ResourceFieldRef(ResourceFieldSelector),
    ConfigMapKeyRef(KeySelector),
    SecretKeyRef(KeySelector),
}

impl EnvVarSource {
    fn validate(&self) -> ValidationResult {
        match self {
            EnvVarSource::FieldRef(f) => require_non_empty("fieldRef.fieldPath", &f.field_path),
            EnvVarSource::ResourceFieldRef(r) => {
                require_non_empty("resourceFieldRef.resource", &r.resource)
            }
            EnvVarSource::ConfigMapKeyRef(k) | EnvVarSource::SecretKeyRef(k) => {
                require_non_empty("keyRef.name", &k.name)?;
                require_non_empty("keyRef.key", &k.key)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFieldSelector {
    pub field_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFieldSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisor: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySelector {
    pub name: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Bulk environment import from a ConfigMap or Secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFromSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<EnvFromRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<EnvFromRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFromRef {
    pub name: String,
}

impl EnvFromSource {
    fn validate(&self) -> ValidationResult {
        match (&self.config_map_ref, &self.secret_ref) {
            (Some(r), None) | (None, Some(r)) => require_non_empty("envFrom name", &r.name),
            _ => Err(ValidationError::invalid(
                "envFrom",
                "exactly one of configMapRef or secretRef is required",
            )),
        }
    }
}

/// `cpu` and `memory`, plus any extended resource (`ephemeral-storage`,
/// `nvidia.com/gpu`, ...) keyed by its name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
    #[serde(flatten)]
    pub extended: BTreeMap<String, Quantity>,
}

impl ResourceList {
    pub fn new(cpu: &str, memory: &str) -> ValidationResult<Self> {
        Ok(Self {
            cpu: Some(Quantity::parse(cpu)?),
            memory: Some(Quantity::parse(memory)?),
            extended: BTreeMap::new(),
        })
    }

    pub fn with_extended(mut self, resource: &str, quantity: &str) -> ValidationResult<Self> {
        require_non_empty("resource name", resource)?;
        self.extended
            .insert(resource.to_string(), Quantity::parse(quantity)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_none() && self.memory.is_none() && self.extended.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "ResourceList::is_empty")]
    pub limits: ResourceList,
    #[serde(default, skip_serializing_if = "ResourceList::is_empty")]
    pub requests: ResourceList,
}

impl ResourceRequirements {
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty() && self.requests.is_empty()
    }

    /// Requests must name both cpu and memory; limits are optional.
    fn validate(&self) -> ValidationResult {
        if self.requests.cpu.is_none() {
            return Err(ValidationError::Empty { field: "resources.requests.cpu" });
        }
        if self.requests.memory.is_none() {
            return Err(ValidationError::Empty {
                field: "resources.requests.memory",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecAction {
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UriScheme {
    Http,
    Https,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpGetAction {
    pub path: String,
    pub port: IntOrString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<UriScheme>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpSocketAction {
    pub port: IntOrString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// The check a probe or lifecycle hook runs. Exactly one mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeHandler {
    Exec(ExecAction),
    HttpGet(HttpGetAction),
    TcpSocket(TcpSocketAction),
}

impl ProbeHandler {
    pub fn exec<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProbeHandler::Exec(ExecAction {
            command: command.into_iter().map(Into::into).collect(),
        })
    }

    pub fn http_get(path: impl Into<String>, port: impl Into<IntOrString>) -> Self {
        ProbeHandler::HttpGet(HttpGetAction {
            path: path.into(),
            port: port.into(),
            host: None,
            scheme: None,
        })
    }

    pub fn tcp_socket(port: impl Into<IntOrString>) -> Self {
        ProbeHandler::TcpSocket(TcpSocketAction {
            port: port.into(),
            host: None,
        })
    }

    /// Each mechanism checks only its own fields.
    pub(crate) fn validate(&self) -> ValidationResult {
        match self {
            ProbeHandler::Exec(exec) => {
                if exec.command.iter().all(String::is_empty) {
                    return Err(ValidationError::EmptyCollection { field: "exec.command" });
                }
            }
            ProbeHandler::HttpGet(http) => {
                require_non_empty("httpGet.path", &http.path)?;
                if http.port.is_zero() {
                    return Err(ValidationError::Empty { field: "httpGet.port" });
                }
            }
            ProbeHandler::TcpSocket(tcp) => {
                if tcp.port.is_zero() {
                    return Err(ValidationError::Empty { field: "tcpSocket.port" });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    #[serde(flatten)]
    pub handler: ProbeHandler,
    #[serde(default = "one")]
    pub initial_delay_seconds: i32,
    #[serde(default = "one")]
    pub timeout_seconds: i32,
    #[serde(default = "ten")]
    pub period_seconds: i32,
    #[serde(default = "one")]
    pub success_threshold: i32,
    #[serde(default = "three")]
    pub failure_threshold: i32,
}

// Timings left out of a parsed probe take the same values as `Probe::new`.
fn one() -> i32 {
    1
}

fn ten() -> i32 {
    10
}

fn three() -> i32 {
    3
}

impl Probe {
    /// A probe with conservative timings: 1s delay, 1s timeout, 10s period,
    /// one success, three failures.
    pub fn new(handler: ProbeHandler) -> Self {
        Self {
            handler,
            initial_delay_seconds: 1,
            timeout_seconds: 1,
            period_seconds: 10,
            success_threshold: 1,
            failure_threshold: 3,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        self.handler.validate()?;
        require_positive("initialDelaySeconds", self.initial_delay_seconds.into())?;
        require_positive("timeoutSeconds", self.timeout_seconds.into())?;
        require_positive("periodSeconds", self.period_seconds.into())?;
        require_positive("successThreshold", self.success_threshold.into())?;
        require_positive("failureThreshold", self.failure_threshold.into())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "one_of")]
    pub post_start: Option<ProbeHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "one_of")]
    pub pre_stop: Option<ProbeHandler>,
}

impl Lifecycle {
    fn validate(&self) -> ValidationResult {
        if self.post_start.is_none() && self.pre_stop.is_none() {
            return Err(ValidationError::Empty { field: "lifecycle" });
        }
        for handler in self.post_start.iter().chain(self.pre_stop.iter()) {
            handler.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

impl VolumeMount {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> ValidationResult {
        require_non_empty("volumeMount name", &self.name)?;
        require_non_empty("volumeMount mountPath", &self.mount_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
}

// ============================================================================
// Container
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ports: Vec<ContainerPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    env_from: Vec<EnvFromSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "ResourceRequirements::is_empty")]
    resources: ResourceRequirements,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volume_mounts: Vec<VolumeMount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    liveness_probe: Option<Probe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    readiness_probe: Option<Probe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    startup_probe: Option<Probe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lifecycle: Option<Lifecycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_pull_policy: Option<ImagePullPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_context: Option<SecurityContext>,
    #[serde(default, skip_serializing_if = "is_false")]
    stdin: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    tty: bool,
}

impl Container {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&str> {
        self.working_dir.as_deref()
    }

    pub fn ports(&self) -> &[ContainerPort] {
        &self.ports
    }

    pub fn env(&self) -> &[EnvVar] {
        &self.env
    }

    pub fn env_from(&self) -> &[EnvFromSource] {
        &self.env_from
    }

    pub fn resources(&self) -> &ResourceRequirements {
        &self.resources
    }

    pub fn volume_mounts(&self) -> &[VolumeMount] {
        &self.volume_mounts
    }

    pub fn liveness_probe(&self) -> Option<&Probe> {
        self.liveness_probe.as_ref()
    }

    pub fn readiness_probe(&self) -> Option<&Probe> {
        self.readiness_probe.as_ref()
    }

    pub fn startup_probe(&self) -> Option<&Probe> {
        self.startup_probe.as_ref()
    }

    pub fn image_pull_policy(&self) -> Option<ImagePullPolicy> {
        self.image_pull_policy
    }

    pub fn security_context(&self) -> Option<&SecurityContext> {
        self.security_context.as_ref()
    }

    pub fn set_name(&mut self, name: &str) -> ValidationResult {
        require_non_empty("container name", name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_image(&mut self, image: &str) -> ValidationResult {
        require_non_empty("container image", image)?;
        self.image = image.to_string();
        Ok(())
    }

    /// Accepts `Always`, `Never` or `IfNotPresent`.
    pub fn set_image_pull_policy(&mut self, policy: &str) -> ValidationResult {
        self.image_pull_policy = Some(parse_enum("imagePullPolicy", policy)?);
        Ok(())
    }

    pub fn set_working_dir(&mut self, dir: &str) -> ValidationResult {
        require_non_empty("workingDir", dir)?;
        self.working_dir = Some(dir.to_string());
        Ok(())
    }

    pub fn set_port(&mut self, port: ContainerPort) -> ValidationResult {
        port.validate()?;
        self.ports.push(port);
        Ok(())
    }

    /// Appends; a repeated name is kept as a second entry.
    pub fn set_env(&mut self, env: EnvVar) -> ValidationResult {
        env.validate()?;
        self.env.push(env);
        Ok(())
    }

    pub fn set_env_from(&mut self, source: EnvFromSource) -> ValidationResult {
        source.validate()?;
        self.env_from.push(source);
        Ok(())
    }

    /// Appends the non-empty entries of `args`. Only an empty slice fails.
    pub fn set_args(&mut self, args: &[&str]) -> ValidationResult {
        append_skipping_empty("args", &mut self.args, args)
    }

    /// Appends the non-empty entries of `commands`. Only an empty slice fails.
    pub fn set_commands(&mut self, commands: &[&str]) -> ValidationResult {
        append_skipping_empty("command", &mut self.command, commands)
    }

    pub fn set_liveness_probe(&mut self, probe: Probe) -> ValidationResult {
        probe.validate()?;
        self.liveness_probe = Some(probe);
        Ok(())
    }

    pub fn set_readiness_probe(&mut self, probe: Probe) -> ValidationResult {
        probe.validate()?;
        self.readiness_probe = Some(probe);
        Ok(())
    }

    /// Holds startup back until it passes; liveness and readiness wait on it.
    pub fn set_startup_probe(&mut self, probe: Probe) -> ValidationResult {
        probe.validate()?;
        self.startup_probe = Some(probe);
        Ok(())
    }

    pub fn set_lifecycle(&mut self, lifecycle: Lifecycle) -> ValidationResult {
        lifecycle.validate()?;
        self.lifecycle = Some(lifecycle);
        Ok(())
    }

    /// Requests must name both cpu and memory; limits are optional.
    pub fn set_resource(&mut self, resources: ResourceRequirements) -> ValidationResult {
        resources.validate()?;
        self.resources = resources;
        Ok(())
    }

    /// Replaces the mount list.
    pub fn set_volume_mounts(&mut self, mounts: Vec<VolumeMount>) -> ValidationResult {
        if mounts.is_empty() {
            return Err(ValidationError::EmptyCollection { field: "volumeMounts" });
        }
        for mount in &mounts {
            mount.validate()?;
        }
        self.volume_mounts = mounts;
        Ok(())
    }

    pub fn add_volume_mount(&mut self, mount: VolumeMount) -> ValidationResult {
        mount.validate()?;
        self.volume_mounts.push(mount);
        Ok(())
    }

    pub fn set_security_context(&mut self, context: SecurityContext) {
        self.security_context = Some(context);
    }

    pub fn set_stdin(&mut self, stdin: bool) {
        self.stdin = stdin;
    }

    pub fn set_tty(&mut self, tty: bool) {
        self.tty = tty;
    }

    /// A container must at least be named and point at an image.
    pub(crate) fn validate_identity(&self) -> ValidationResult {
        require_non_empty("container name", &self.name)?;
        require_non_empty("container image", &self.image)
    }

    /// Re-applies every setter rule to the current field values.
    pub(crate) fn validate(&self) -> ValidationResult {
        self.validate_identity()?;
        if let Some(dir) = &self.working_dir {
            require_non_empty("workingDir", dir)?;
        }
        for port in &self.ports {
            port.validate()?;
        }
        for env in &self.env {
            env.validate()?;
        }
        for source in &self.env_from {
            source.validate()?;
        }
        if !self.resources.is_empty() {
            self.resources.validate()?;
        }
        for mount in &self.volume_mounts {
            mount.validate()?;
        }
        for probe in [&self.liveness_probe, &self.readiness_probe, &self.startup_probe]
            .into_iter()
            .flatten()
        {
            probe.validate()?;
        }
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.validate()?;
        }
        Ok(())
    }
}

fn append_skipping_empty(
    field: &'static str,
    target: &mut Vec<String>,
    items: &[&str],
) -> ValidationResult {
    if items.is_empty() {
        return Err(ValidationError::EmptyCollection { field });
    }
    target.extend(
        items
            .iter()
            .filter(|item| !item.is_empty())
            .map(|item| item.to_string()),
    );
    Ok(())
}
