//! mdspace - markdown 工作区核心库
//!
//! 模块结构：
//! - models: 数据模型（DocumentRecord, FileSystem, FileMap, Selection）
//! - kernel: 文档注册表、文件树持久化与同步、事件总线、存储端口
//! - views: 预览视图（选区镜像、滚动同步）
//! - workspace: 面向用户操作的工作区外观

pub mod kernel;
pub mod models;
pub mod views;
pub mod workspace;

pub use workspace::Workspace;
