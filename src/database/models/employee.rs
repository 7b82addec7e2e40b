use serde::{Deserialize, Serialize};

/// The slice of an employee the clock engine reads and toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub role: Option<String>,
    pub department_id: Option<i64>,
    pub is_active: bool,
}

impl Employee {
    /// Role and department, present only when both are assigned.
    pub fn assignment(&self) -> Option<(&str, i64)> {
        match (self.role.as_deref(), self.department_id) {
            (Some(role), Some(department_id)) if !role.is_empty() => Some((role, department_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_requires_role_and_department() {
        let mut employee = Employee {
            id: 1,
            role: Some("EMPLOYEE".to_string()),
            department_id: Some(2),
            is_active: false,
        };
        assert_eq!(employee.assignment(), Some(("EMPLOYEE", 2)));

        employee.department_id = None;
        assert_eq!(employee.assignment(), None);

        employee.department_id = Some(2);
        employee.role = Some(String::new());
        assert_eq!(employee.assignment(), None);
    }
}
