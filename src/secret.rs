//! 비밀 저장소 모듈: 자격 증명 보관 capability
//!
//! 클라이언트는 비밀번호 보관 방식을 알지 못하며, 호출 시점에 [`SecretStore::reveal`]로
//! 평문을 얻어 세션에 넣을 뿐입니다. 플랫폼별 메모리 보호는 구현체의 세부 사항입니다.

use std::collections::HashMap;
use std::fmt;

/// 저장된 비밀을 가리키는 불투명 핸들
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecretHandle(u64);

/// 비밀 저장소 capability
pub trait SecretStore {
    /// 평문을 저장하고 핸들을 반환합니다.
    fn store(&mut self, plaintext: &str) -> SecretHandle;

    /// 핸들이 가리키는 평문을 반환합니다. 알 수 없는 핸들이면 `None`.
    fn reveal(&self, handle: &SecretHandle) -> Option<String>;

    /// 핸들이 가리키는 평문을 폐기합니다. 폐기했으면 `true`.
    ///
    /// 폐기 후 같은 핸들로 [`reveal`](SecretStore::reveal)하면 `None`입니다.
    fn forget(&mut self, handle: &SecretHandle) -> bool;
}

/// 프로세스 메모리에만 보관하는 기본 구현
#[derive(Default)]
pub struct MemorySecretStore {
    next: u64,
    entries: HashMap<u64, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySecretStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl SecretStore for MemorySecretStore {
    fn store(&mut self, plaintext: &str) -> SecretHandle {
        let id = self.next;
        self.next += 1;
        self.entries.insert(id, plaintext.to_string());
        SecretHandle(id)
    }

    fn reveal(&self, handle: &SecretHandle) -> Option<String> {
        self.entries.get(&handle.0).cloned()
    }

    fn forget(&mut self, handle: &SecretHandle) -> bool {
        self.entries.remove(&handle.0).is_some()
    }
}
