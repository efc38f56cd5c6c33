use texting_robots::Robot;

/// Robots-exclusion rules for one host. Falls back to permissive (allow
/// all) when no body was supplied or it failed to parse, matching the
/// original crawler's behavior of treating the robots subsystem as
/// optional rather than load-bearing.
pub struct RobotsRules {
    robot: Option<Robot>,
}

impl RobotsRules {
    pub fn build(user_agent: &str, text: Option<&str>) -> Self {
        let robot = text.and_then(|t| Robot::new(user_agent, t.as_bytes()).ok());
        Self { robot }
    }

    pub fn permissive() -> Self {
        Self { robot: None }
    }

    pub fn allows(&self, url: &str) -> bool {
        match &self.robot {
            Some(robot) => robot.allowed(url),
            None => true,
        }
    }
}
