use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StepId {
    Upload,
    Auth,
    Config,
    Migrate,
    Complete,
}

pub const WIZARD_STEPS: [StepId; 5] = [
    StepId::Upload,
    StepId::Auth,
    StepId::Config,
    StepId::Migrate,
    StepId::Complete,
];

impl StepId {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Auth => "auth",
            Self::Config => "config",
            Self::Migrate => "migrate",
            Self::Complete => "complete",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload archive",
            Self::Auth => "Sign in",
            Self::Config => "Migration options",
            Self::Migrate => "Run migration",
            Self::Complete => "Results",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        WIZARD_STEPS
            .into_iter()
            .find(|step| step.segment() == segment)
    }

    pub fn path(self) -> String {
        format!("wizard/{}", self.segment())
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRouteData {
    pub description: String,
    pub next: Option<StepId>,
    pub previous: Option<StepId>,
}

pub fn route_data(step: StepId) -> StepRouteData {
    let (description, next, previous) = match step {
        StepId::Upload => ("Stage the archive to migrate", Some(StepId::Auth), None),
        StepId::Auth => (
            "Sign in to the migration service",
            Some(StepId::Config),
            Some(StepId::Upload),
        ),
        StepId::Config => (
            "Choose migration options",
            Some(StepId::Migrate),
            Some(StepId::Auth),
        ),
        StepId::Migrate => (
            "Run the migration job",
            Some(StepId::Complete),
            Some(StepId::Config),
        ),
        StepId::Complete => ("Review the migration report", None, Some(StepId::Migrate)),
    };

    StepRouteData {
        description: description.to_string(),
        next,
        previous,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNode {
    pub static_segment: Option<String>,
    pub url_segments: Vec<String>,
}

impl RouteNode {
    pub fn for_step(step: StepId) -> Self {
        Self {
            static_segment: Some(step.segment().to_string()),
            url_segments: vec!["wizard".to_string(), step.segment().to_string()],
        }
    }
}

pub fn route_key(node: &RouteNode) -> String {
    match node.static_segment.as_deref() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => node.url_segments.join("/"),
    }
}
