use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store. Ids start at 1, like a SERIAL column.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<UserTable>,
}

#[derive(Default)]
struct UserTable {
    last_id: i64,
    by_username: HashMap<Username, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        // Check and insert under one write lock, standing in for the UNIQUE constraint.
        let mut table = self.state.write().await;
        if table.by_username.contains_key(&user.username) {
            return Err(UserError::UserExists(user.username.to_string()));
        }

        table.last_id += 1;
        let created = User {
            id: UserId(table.last_id),
            username: user.username,
            password_hash: user.password_hash,
        };
        table
            .by_username
            .insert(created.username.clone(), created.clone());

        Ok(created)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.by_username.get(username).cloned())
    }
}

/// Process-local task store keyed by `(owner, id)`.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    state: RwLock<TaskTable>,
}

#[derive(Default)]
struct TaskTable {
    last_id: i64,
    rows: BTreeMap<(UserId, TaskId), Task>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(
        &self,
        owner_id: UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut table = self.state.write().await;
        table.last_id += 1;
        let id = TaskId::new(table.last_id).map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        let task = Task {
            id,
            owner_id,
            title: command.title,
            description: command.description,
            completed: false,
        };
        table.rows.insert((owner_id, id), task.clone());

        Ok(task)
    }

    async fn update(
        &self,
        owner_id: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<(), TaskError> {
        let mut table = self.state.write().await;
        let task = table
            .rows
            .get_mut(&(owner_id, id))
            .ok_or(TaskError::TaskNotFound)?;

        task.title = command.title;
        task.description = command.description;
        task.completed = command.completed;

        Ok(())
    }

    async fn delete(&self, owner_id: UserId, id: TaskId) -> Result<(), TaskError> {
        self.state
            .write()
            .await
            .rows
            .remove(&(owner_id, id))
            .map(|_| ())
            .ok_or(TaskError::TaskNotFound)
    }

    async fn find_by_id(&self, owner_id: UserId, id: TaskId) -> Result<Option<Task>, TaskError> {
        Ok(self.state.read().await.rows.get(&(owner_id, id)).cloned())
    }

    async fn find_all(&self, owner_id: UserId) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .state
            .read()
            .await
            .rows
            .range((owner_id, TaskId::MIN)..=(owner_id, TaskId::MAX))
            .map(|(_, task)| task.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::task::models::TaskTitle;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: Username::new(name.to_string()).unwrap(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    fn create_command(title: &str) -> CreateTaskCommand {
        CreateTaskCommand::new(TaskTitle::new(title.to_string()).unwrap(), String::new())
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential() {
        let repository = InMemoryUserRepository::new();

        assert_eq!(repository.create(new_user("alice")).await.unwrap().id, UserId(1));
        assert_eq!(repository.create(new_user("bob")).await.unwrap().id, UserId(2));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_create_one_row() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.create(new_user("alice")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, UserError::UserExists(_))),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_tasks_scoped_by_owner() {
        let repository = InMemoryTaskRepository::new();
        let alice = UserId(1);
        let bob = UserId(2);

        let alice_task = repository.create(alice, create_command("buy milk")).await.unwrap();
        let bob_task = repository.create(bob, create_command("walk dog")).await.unwrap();

        assert!(repository
            .find_by_id(alice, bob_task.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            repository.delete(alice, bob_task.id).await,
            Err(TaskError::TaskNotFound)
        );
        assert_eq!(
            repository
                .update(
                    alice,
                    bob_task.id,
                    UpdateTaskCommand::new(
                        TaskTitle::new("stolen".to_string()).unwrap(),
                        String::new(),
                        true,
                    ),
                )
                .await,
            Err(TaskError::TaskNotFound)
        );

        let bob_view = repository.find_by_id(bob, bob_task.id).await.unwrap().unwrap();
        assert_eq!(bob_view.title.as_str(), "walk dog");
        assert!(!bob_view.completed);

        let alice_tasks = repository.find_all(alice).await.unwrap();
        assert_eq!(alice_tasks, vec![alice_task]);
        assert!(repository.find_all(UserId(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_reads_only_owner_range() {
        let repository = InMemoryTaskRepository::new();
        let (first, middle, last) = (UserId(1), UserId(2), UserId(3));

        let mut expected = Vec::new();
        for title in ["a", "b", "c"] {
            repository.create(first, create_command(title)).await.unwrap();
            expected.push(repository.create(middle, create_command(title)).await.unwrap());
            repository.create(last, create_command(title)).await.unwrap();
        }

        let tasks = repository.find_all(middle).await.unwrap();
        assert_eq!(tasks, expected);
        assert!(tasks.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert!(tasks.iter().all(|task| task.owner_id == middle));
    }
}
