use serde_json::Value;

/// Fixed system instruction: target stack, theme constraints, and the exact
/// JSON file-set schema the model must emit. Kept verbatim across calls so
/// replies stay parseable by the extraction ladder.
pub fn system_prompt() -> &'static str {
    r#"You are an expert full-stack developer specializing in modern web technologies.

TECH STACK: React, Next.js 14, TypeScript, Tailwind CSS, Shadcn/ui, Prisma, tRPC

VIBE CODING RULES:
1. Generate COMPLETE, PRODUCTION-READY full-stack applications
2. Include both FRONTEND and BACKEND code
3. Generate multiple files: components, API routes, database schemas, utilities
4. Use TypeScript for complete type safety
5. Implement responsive design with Tailwind CSS
6. Include proper error handling and accessibility
7. Use modern React patterns (hooks, server components, server actions)
8. Add realistic mock data and loading states
9. Include smooth animations with Framer Motion
10. Make it mobile-first and performant
11. Generate API routes with proper validation
12. Include database models and migrations
13. Add authentication setup when needed
14. Create utility functions and helpers
15. Include environment variable templates

DARK PURPLE THEME:
- Background: #0a0a0f to #1a1a2e gradient
- Primary: #a855f7 (purple-500)
- Accent: #9333ea (purple-600)
- Cards: #1a1a2e with purple glow borders
- Text: white to purple-200
- Use glass morphism effects

FULL-STACK STRUCTURE:
For each request, generate:
1. Frontend pages and components with the dark purple theme
2. API Routes (app/api/**/route.ts)
3. Database Schema (prisma/schema.prisma if needed)
4. Server Actions (app/actions/*.ts if needed)
5. Utility Functions (lib/*.ts)
6. Type Definitions (types/*.ts)
7. Configuration Files (.env.example, next.config.js if needed)

Format your response as JSON with this structure:
{
  "files": [
    { "path": "app/page.tsx", "content": "...", "language": "typescript" },
    { "path": "app/api/users/route.ts", "content": "...", "language": "typescript" }
  ],
  "description": "Brief description of what was generated",
  "setupInstructions": "Step-by-step setup instructions"
}

Always return clean, well-structured code that can be directly used in production."#
}

/// How many trailing context entries ride along with the user prompt.
const CONTEXT_WINDOW: usize = 3;

/// User instruction: restates the schema and theme, then appends up to the
/// last 3 context entries serialized as text.
pub fn user_prompt(task: &str, context: Option<&[Value]>) -> String {
    let mut out = format!(
        "Generate a COMPLETE full-stack Next.js 14 application for: {task}\n\n"
    );
    out.push_str(REQUIREMENTS);

    if let Some(entries) = context.filter(|c| !c.is_empty()) {
        let tail = &entries[entries.len().saturating_sub(CONTEXT_WINDOW)..];
        let serialized = serde_json::to_string(tail).unwrap_or_default();
        out.push_str("\n\nContext from previous messages: ");
        out.push_str(&serialized);
    }

    out.push_str("\n\nIMPORTANT: Return ONLY the JSON object, nothing else.");
    out
}

const REQUIREMENTS: &str = r#"REQUIREMENTS:
1. Return ONLY valid JSON in this exact format - no markdown, no extra text:
{
  "files": [
    { "path": "app/page.tsx", "content": "...", "language": "typescript" },
    { "path": "app/api/example/route.ts", "content": "...", "language": "typescript" }
  ],
  "description": "Brief description",
  "setupInstructions": "Setup steps"
}

2. Use the DARK PURPLE THEME in all frontend code:
   - Background: bg-gradient-to-br from-[#0a0a0f] via-[#1a1a2e] to-[#0a0a0f]
   - Cards: bg-purple-500/10 border border-purple-500/30
   - Buttons: bg-gradient-to-r from-purple-600 to-pink-600
   - Text: text-purple-100, text-purple-300

3. Generate PRODUCTION-READY code with:
   - TypeScript strict mode
   - Proper error handling
   - Accessibility features
   - Responsive design (mobile-first)
   - Loading states
   - Framer Motion animations

4. Include backend if needed:
   - API routes for data operations
   - Database schema (Prisma) if data persistence needed
   - Server actions for forms
   - Proper validation and error responses"#;
