//! 模拟审计日志生成器
//!
//! 生成的数据形状与业务系统写入的审计记录一致，供手工测试过滤功能使用。

use crate::models::{ActionType, EntityType, NewAuditLog, ValueSnapshot};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

/// 模拟操作人名单
pub const ADMIN_ROSTER: [&str; 4] = [
    "System Administrator",
    "John Doe",
    "Jane Smith",
    "Benaiah Lushomo",
];

pub const PERFORMED_BY_TYPE: &str = "ADMIN";

/// created_at 落在 [now - 30 天, now] 之内
const MAX_DAYS_AGO: i64 = 29;

pub struct MockLogGenerator<R: Rng> {
    rng: R,
    now: DateTime<Utc>,
}

impl MockLogGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng(), Utc::now())
    }
}

impl Default for MockLogGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MockLogGenerator<R> {
    pub fn with_rng(rng: R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn generate(&mut self, count: usize) -> Vec<NewAuditLog> {
        (0..count).map(|_| self.next_log()).collect()
    }

    pub fn next_log(&mut self) -> NewAuditLog {
        let action_type = *ActionType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&ActionType::Create);
        let entity_type = *EntityType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&EntityType::Employee);
        let created_at = self.random_created_at();

        let old_values = ValueSnapshot {
            used_days: self.rng.gen_range(0..=50),
            employee_number: format!("EMP{}", self.rng.gen_range(1000..=9999)),
            name: format!("Employee {}", self.rng.gen_range(1..=100)),
        };
        let (new_values, description) = self.apply_action(action_type, &old_values);

        NewAuditLog {
            action_type,
            entity_type,
            entity_id: self.rng.gen_range(1..=100),
            entity_name: old_values.name.clone(),
            performed_by_id: self.rng.gen_range(1..=5),
            performed_by_type: PERFORMED_BY_TYPE.to_string(),
            performed_by_name: ADMIN_ROSTER
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(ADMIN_ROSTER[0])
                .to_string(),
            old_values,
            new_values,
            description,
            ip_address: format!("192.168.1.{}", self.rng.gen_range(1..=255)),
            created_at,
        }
    }

    fn apply_action(&mut self, action: ActionType, old: &ValueSnapshot) -> (ValueSnapshot, String) {
        let mut new = old.clone();
        let description = match action {
            ActionType::AddDays => {
                let days = self.rng.gen_range(1..=10);
                new.used_days += days;
                format!("Added {days} days")
            }
            ActionType::SubtractDays => {
                let days = self.rng.gen_range(1..=10);
                new.used_days -= days;
                format!("Subtracted {days} days")
            }
            ActionType::SetDays => {
                new.used_days = self.rng.gen_range(0..=100);
                format!("Set days to {}", new.used_days)
            }
            ActionType::Update => {
                new.name = format!("Updated {}", old.name);
                "Updated employee details".to_string()
            }
            ActionType::Create | ActionType::Delete => format!("Performed {action}"),
        };
        (new, description)
    }

    fn random_created_at(&mut self) -> DateTime<Utc> {
        let offset = Duration::days(self.rng.gen_range(0..=MAX_DAYS_AGO))
            + Duration::hours(self.rng.gen_range(0..=23))
            + Duration::minutes(self.rng.gen_range(0..=59));
        self.now - offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{BTreeSet, HashSet};

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample(count: usize) -> Vec<NewAuditLog> {
        MockLogGenerator::with_rng(StdRng::seed_from_u64(7), fixed_now()).generate(count)
    }

    fn keys(value: &serde_json::Value) -> BTreeSet<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_generate_returns_requested_count() {
        assert_eq!(sample(0).len(), 0);
        assert_eq!(sample(400).len(), 400);
    }

    #[test]
    fn test_snapshots_share_key_set() {
        for log in sample(500) {
            assert_eq!(keys(&log.old_values.to_json()), keys(&log.new_values.to_json()));
        }
    }

    #[test]
    fn test_used_days_follow_action_semantics() {
        for log in sample(2000) {
            let old = log.old_values.used_days;
            let new = log.new_values.used_days;
            match log.action_type {
                ActionType::AddDays => {
                    assert!((1..=10).contains(&(new - old)), "ADD_DAYS 差值越界: {log:?}");
                    assert_eq!(log.description, format!("Added {} days", new - old));
                }
                ActionType::SubtractDays => {
                    assert!((1..=10).contains(&(old - new)), "SUBTRACT_DAYS 差值越界: {log:?}");
                    assert_eq!(log.description, format!("Subtracted {} days", old - new));
                }
                ActionType::SetDays => {
                    assert!((0..=100).contains(&new), "SET_DAYS 取值越界: {log:?}");
                    assert_eq!(log.description, format!("Set days to {new}"));
                }
                ActionType::Update => {
                    assert_eq!(new, old);
                    assert_eq!(log.new_values.name, format!("Updated {}", log.old_values.name));
                    assert_eq!(log.new_values.employee_number, log.old_values.employee_number);
                }
                ActionType::Create | ActionType::Delete => {
                    assert_eq!(log.new_values, log.old_values);
                    assert_eq!(log.description, format!("Performed {}", log.action_type));
                }
            }
        }
    }

    #[test]
    fn test_created_at_within_past_thirty_days() {
        let now = fixed_now();
        for log in sample(2000) {
            assert!(log.created_at <= now);
            assert!(log.created_at >= now - Duration::days(30));
        }
    }

    #[test]
    fn test_field_ranges_and_constants() {
        for log in sample(1000) {
            assert!((1..=100).contains(&log.entity_id));
            assert!((1..=5).contains(&log.performed_by_id));
            assert_eq!(log.performed_by_type, PERFORMED_BY_TYPE);
            assert!(ADMIN_ROSTER.contains(&log.performed_by_name.as_str()));
            assert_eq!(log.entity_name, log.old_values.name);
            assert!((0..=50).contains(&log.old_values.used_days));

            let number: u32 = log.old_values.employee_number["EMP".len()..].parse().unwrap();
            assert!((1000..=9999).contains(&number));

            let last_octet: u32 = log
                .ip_address
                .strip_prefix("192.168.1.")
                .unwrap()
                .parse()
                .unwrap();
            assert!((1..=255).contains(&last_octet));
        }
    }

    #[test]
    fn test_every_enum_value_is_drawn() {
        let logs = sample(1000);
        let actions: HashSet<ActionType> = logs.iter().map(|l| l.action_type).collect();
        let entities: HashSet<EntityType> = logs.iter().map(|l| l.entity_type).collect();
        assert_eq!(actions.len(), ActionType::ALL.len());
        assert_eq!(entities.len(), EntityType::ALL.len());
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        assert_eq!(sample(50), sample(50));
    }
}
