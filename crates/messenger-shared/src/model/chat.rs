use serde::{Deserialize, Serialize};

use crate::constants::FIRST_MESSAGE_ID;
use crate::error::{MessengerError, Result, UserNotFound};
use crate::model::{Message, Reaction, ReactionType, User};
use crate::types::{ChatId, MessageId, UserId};

/// Extension carried by group chats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: String,
}

/// A conversation, either direct or group.
///
/// Messages are append-only and owned by the chat. Participants are kept in
/// join order without duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub(crate) participants: Vec<UserId>,
    messages: Vec<Message>,
    reactions: Vec<Reaction>,
    group: Option<GroupInfo>,
}

impl Chat {
    pub fn direct(id: ChatId) -> Self {
        Self {
            id,
            participants: Vec::new(),
            messages: Vec::new(),
            reactions: Vec::new(),
            group: None,
        }
    }

    pub fn group(id: ChatId, name: impl Into<String>) -> Self {
        Self {
            group: Some(GroupInfo { name: name.into() }),
            ..Self::direct(id)
        }
    }

    /// Rebuild a chat from stored parts.
    pub fn restore(id: ChatId, group_name: Option<String>, messages: Vec<Message>) -> Self {
        Self {
            messages,
            group: group_name.map(|name| GroupInfo { name }),
            ..Self::direct(id)
        }
    }

    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_ref().map(|g| g.name.as_str())
    }

    pub fn rename_group(&mut self, name: impl Into<String>) -> Result<()> {
        let group = self.group.as_mut().ok_or(MessengerError::NotAGroupChat(self.id))?;
        group.name = name.into();
        Ok(())
    }

    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    pub fn has_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Id the next appended message will get.
    pub fn next_message_id(&self) -> MessageId {
        MessageId(self.messages.len() as u64 + FIRST_MESSAGE_ID)
    }

    /// Append unconditionally.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn push(&mut self, message: Message) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn get_last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read()).count()
    }

    pub fn mark_all_read(&mut self) {
        self.messages.iter_mut().for_each(Message::mark_as_read);
    }

    /// Make this chat's side of the membership agree with `user`'s own chat
    /// list, adding or dropping the participant. Returns `true` on change.
    /// Used when relinking entities rebuilt from stored records.
    pub fn sync_member(&mut self, user: &User) -> bool {
        match (user.is_member_of(self.id), self.has_participant(user.id)) {
            (true, false) => {
                self.participants.push(user.id);
                true
            }
            (false, true) => {
                self.participants.retain(|p| *p != user.id);
                true
            }
            _ => false,
        }
    }

    /// The other side of a direct chat. `None` for groups.
    pub(crate) fn counterpart_of(&self, user: UserId) -> Option<UserId> {
        if self.is_group() {
            return None;
        }
        self.participants.iter().copied().find(|p| *p != user)
    }

    // ------------------------------------------------------------------
    // Group participants
    // ------------------------------------------------------------------

    /// Add `user` to this group, recording the membership on both sides.
    pub fn add_participant(&mut self, user: &mut User) -> Result<()> {
        if !self.is_group() {
            return Err(MessengerError::NotAGroupChat(self.id));
        }
        if self.has_participant(user.id) {
            return Err(MessengerError::AlreadyMember {
                user: user.id,
                chat: self.id,
            });
        }

        self.participants.push(user.id);
        if !user.chats.contains(&self.id) {
            user.chats.push(self.id);
        }
        Ok(())
    }

    /// Remove `user` from this group and drop the chat from its list.
    pub fn remove_participant(&mut self, user: &mut User) -> Result<()> {
        if !self.is_group() {
            return Err(MessengerError::NotAGroupChat(self.id));
        }
        let position = self
            .participants
            .iter()
            .position(|p| *p == user.id)
            .ok_or(UserNotFound::NotAParticipant {
                user: user.id,
                chat: self.id,
            })?;

        self.participants.remove(position);
        user.chats.retain(|c| *c != self.id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reactions
    // ------------------------------------------------------------------

    /// Attach a reaction to one of this chat's messages. Re-adding the same
    /// reaction is a no-op.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<()> {
        if self.message(reaction.message_id).is_none() {
            return Err(MessengerError::MessageNotFound {
                chat: self.id,
                message: reaction.message_id,
            });
        }
        if !self.reactions.contains(&reaction) {
            self.reactions.push(reaction);
        }
        Ok(())
    }

    /// Returns `true` if a reaction was removed.
    pub fn remove_reaction(
        &mut self,
        message_id: MessageId,
        user: UserId,
        reaction_type: &ReactionType,
    ) -> bool {
        let before = self.reactions.len();
        self.reactions.retain(|r| {
            !(r.message_id == message_id && r.user == user && &r.reaction_type == reaction_type)
        });
        self.reactions.len() != before
    }

    pub fn reactions_for(&self, message_id: MessageId) -> Vec<&Reaction> {
        self.reactions
            .iter()
            .filter(|r| r.message_id == message_id)
            .collect()
    }
}
